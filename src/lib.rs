//! Keep package recipes in sync with the latest upstream GitHub release
//!
//! A run looks up the newest release of a repository, picks one asset per
//! platform by filename substring, hashes each asset, and writes the new
//! version and hashes out.
//!
//! # Output back-ends
//!
//! - **recipe**: patch an existing build recipe (for example a `flake.nix`)
//!   in place. Values to rewrite are marked with anchor comments:
//!
//! ```nix
//! #:version:
//! version = "1.0.0";
//! "x86_64-linux" = {
//!   #:sha256:
//!   sha256 = "sha256:...";
//! };
//! ```
//!
//! - **manifest**: write a fresh JSON document:
//!
//! ```json
//! {
//!   "version": "1.2.3",
//!   "platforms": {
//!     "x86_64-linux": { "url": "https://...", "sha256": "sha256:..." }
//!   }
//! }
//! ```
//!
//! # Hashing
//!
//! - `stream`: download the asset and hash it locally (SHA-256, hex)
//! - `prefetch`: run `nix-prefetch-url`, unpacking archives first
//!
//! # Platforms
//!
//! `x86_64-linux`, `aarch64-linux`, `aarch64-darwin`, `x86_64-darwin`.
//! A platform with no matching asset is skipped with a warning.

pub mod core;
pub mod hash;
pub mod manifest;
pub mod release;
pub mod sync;

pub use crate::core::config::{self, SyncConfig};
pub use crate::core::error::{Result, SyncError};
pub use crate::core::output;
pub use hash::{AssetHasher, HashStrategy};
pub use manifest::OutputBackend;
pub use release::{Platform, Release};
pub use sync::{SyncOutcome, run, run_with_hasher};
