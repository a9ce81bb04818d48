//! Hash acquisition for release assets
//!
//! Two interchangeable strategies sit behind [`AssetHasher`]:
//!
//! - [`StreamingHasher`]: downloads the asset and feeds it through SHA-256
//!   chunk by chunk, never keeping the bytes.
//! - [`PrefetchHasher`]: delegates to `nix-prefetch-url`, which produces the
//!   hash Nix expects for fetchurl (disk images) or fetchzip (archives).
//!
//! Both return hashes in the `sha256:<digest>` form.

pub mod prefetch;
pub mod stream;

pub use prefetch::PrefetchHasher;
pub use stream::StreamingHasher;

use crate::core::error::Result;
use serde::Deserialize;

/// Literal tag written in front of every hash value
pub const HASH_PREFIX: &str = "sha256:";

/// Computes the content hash of the asset behind a URL.
pub trait AssetHasher {
    fn compute_hash(&self, url: &str) -> Result<String>;
}

/// Which hashing backend a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HashStrategy {
    /// Download and hash locally
    #[default]
    Stream,
    /// Shell out to nix-prefetch-url
    Prefetch,
}

impl HashStrategy {
    /// Build the hasher for this strategy.
    ///
    /// `prefetch_tool` is only used by [`HashStrategy::Prefetch`].
    pub fn build(&self, prefetch_tool: &str) -> Box<dyn AssetHasher> {
        match self {
            Self::Stream => Box::new(StreamingHasher::new()),
            Self::Prefetch => Box::new(PrefetchHasher::new(prefetch_tool)),
        }
    }
}

/// Tag a raw digest with [`HASH_PREFIX`].
pub fn prefixed(digest: &str) -> String {
    format!("{}{}", HASH_PREFIX, digest)
}
