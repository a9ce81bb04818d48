//! Anchor-driven rewriting of a build recipe
//!
//! Recipes mark the values to update with comment anchors. The assignment
//! following an anchor is replaced; every other line is kept byte for byte.
//!
//! ```nix
//! #:version:
//! version = "1.0.0";
//! downloads = {
//!   "x86_64-linux" = {
//!     url = "...";
//!     #:sha256:
//!     sha256 = "sha256:...";
//!   };
//! };
//! ```

use crate::release::Platform;

/// Marks the line before the version assignment
pub const VERSION_ANCHOR: &str = "#:version:";

/// Marks the line before a platform's hash assignment
pub const HASH_ANCHOR: &str = "#:sha256:";

const VERSION_TOKEN: &str = "version =";
const HASH_TOKEN: &str = "sha256 =";

/// Result of applying one rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub content: String,
    /// False when no anchor/assignment pair was found; `content` is then
    /// identical to the input.
    pub applied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VersionScan {
    Searching,
    AwaitingAssignment,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockScan {
    Searching,
    InPlatformBlock(Platform),
    AwaitingAssignment(Platform),
}

/// The quoted opener that starts a platform's block, e.g. `"x86_64-linux" = {`.
pub fn block_opener(platform: Platform) -> String {
    format!("\"{}\" = {{", platform.key())
}

/// Rewrite the assignment after the first version anchor.
pub fn update_version(content: &str, version: &str) -> Patched {
    let replacement = format!("    version = \"{}\";", version);
    let mut state = VersionScan::Searching;

    let lines: Vec<String> = content
        .split('\n')
        .map(|line| match state {
            VersionScan::Searching if line.contains(VERSION_ANCHOR) => {
                state = VersionScan::AwaitingAssignment;
                line.to_string()
            }
            VersionScan::AwaitingAssignment if line.contains(VERSION_TOKEN) => {
                state = VersionScan::Done;
                replace_line(line, &replacement)
            }
            _ => line.to_string(),
        })
        .collect();

    Patched {
        content: lines.join("\n"),
        applied: state == VersionScan::Done,
    }
}

/// Rewrite the hash assignment inside `platform`'s block.
///
/// The block starts at its quoted opener and ends at the opener of any other
/// platform, so an assignment belonging to another block is never touched.
/// A block is rewritten at most once.
pub fn update_hash(content: &str, platform: Platform, hash: &str) -> Patched {
    let replacement = format!("        sha256 = \"{}\";", hash);
    let openers: Vec<(Platform, String)> = Platform::ALL
        .into_iter()
        .map(|p| (p, block_opener(p)))
        .collect();

    let mut state = BlockScan::Searching;
    let mut applied = false;

    let lines: Vec<String> = content
        .split('\n')
        .map(|line| {
            if let Some((opened, _)) = openers.iter().find(|(_, o)| line.contains(o.as_str())) {
                state = BlockScan::InPlatformBlock(*opened);
                return line.to_string();
            }
            match state {
                BlockScan::InPlatformBlock(p) if p == platform && line.contains(HASH_ANCHOR) => {
                    state = BlockScan::AwaitingAssignment(p);
                    line.to_string()
                }
                BlockScan::AwaitingAssignment(_) if line.contains(HASH_TOKEN) => {
                    state = BlockScan::Searching;
                    applied = true;
                    replace_line(line, &replacement)
                }
                _ => line.to_string(),
            }
        })
        .collect();

    Patched {
        content: lines.join("\n"),
        applied,
    }
}

/// Swap a line for `replacement`, keeping a trailing carriage return.
fn replace_line(original: &str, replacement: &str) -> String {
    if original.ends_with('\r') {
        format!("{}\r", replacement)
    } else {
        replacement.to_string()
    }
}
