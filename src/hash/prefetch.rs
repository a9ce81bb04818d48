//! Hashing through `nix-prefetch-url`
//!
//! Disk images are hashed as flat files. Archives are unpacked first so the
//! hash matches what `fetchzip` expects for the unpacked tree.

use super::{AssetHasher, prefixed};
use crate::core::error::{Result, SyncError};
use crate::core::output;
use std::process::Command;

/// Default hashing tool
pub const DEFAULT_PREFETCH_TOOL: &str = "nix-prefetch-url";

/// Delegates hashing to an external content-addressing tool.
#[derive(Debug, Clone)]
pub struct PrefetchHasher {
    tool: String,
    leading_args: Vec<String>,
}

impl PrefetchHasher {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            leading_args: Vec::new(),
        }
    }

    /// Run `tool` with `leading_args` placed before the prefetch arguments,
    /// e.g. an interpreter followed by a script path.
    pub fn with_leading_args(tool: impl Into<String>, leading_args: Vec<String>) -> Self {
        Self {
            tool: tool.into(),
            leading_args,
        }
    }
}

impl Default for PrefetchHasher {
    fn default() -> Self {
        Self::new(DEFAULT_PREFETCH_TOOL)
    }
}

/// Whether the URL points at a disk image (hashed without unpacking).
pub fn is_disk_image(url: &str) -> bool {
    let clean = url.split(['?', '#']).next().unwrap_or(url);
    clean.to_ascii_lowercase().ends_with(".dmg")
}

/// Arguments passed to the tool for `url`.
pub fn prefetch_args(url: &str) -> Vec<String> {
    if is_disk_image(url) {
        vec![url.to_string()]
    } else {
        vec![
            "--type".to_string(),
            "sha256".to_string(),
            "--unpack".to_string(),
            url.to_string(),
        ]
    }
}

impl AssetHasher for PrefetchHasher {
    fn compute_hash(&self, url: &str) -> Result<String> {
        let bin = which::which(&self.tool).map_err(|e| {
            SyncError::hash(url, format!("cannot find '{}' on PATH: {}", self.tool, e))
        })?;

        let args = prefetch_args(url);
        output::detail(&format!("running {} {}", self.tool, args.join(" ")));

        let result = Command::new(&bin)
            .args(&self.leading_args)
            .args(&args)
            .output()
            .map_err(|e| SyncError::hash(url, format!("failed to execute {}: {}", self.tool, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(SyncError::hash(url, stderr.trim()));
        }

        let digest = String::from_utf8_lossy(&result.stdout).trim().to_string();
        if digest.is_empty() {
            return Err(SyncError::hash(
                url,
                format!("{} printed no hash", self.tool),
            ));
        }

        output::detail(&format!("hash {}", digest));
        Ok(prefixed(&digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_image_detection() {
        assert!(is_disk_image("https://dl/zen.macos-universal.dmg"));
        assert!(is_disk_image("https://dl/Zen.DMG?download=1"));
        assert!(!is_disk_image("https://dl/zen.linux-x86_64.tar.xz"));
        assert!(!is_disk_image("https://dl/dmg/zen.tar.bz2"));
    }

    #[test]
    fn test_prefetch_args_for_archive_unpacks() {
        let args = prefetch_args("https://dl/zen.linux-x86_64.tar.xz");
        assert_eq!(
            args,
            ["--type", "sha256", "--unpack", "https://dl/zen.linux-x86_64.tar.xz"]
        );
    }

    #[test]
    fn test_prefetch_args_for_dmg_is_plain() {
        let args = prefetch_args("https://dl/zen.macos-universal.dmg");
        assert_eq!(args, ["https://dl/zen.macos-universal.dmg"]);
    }

    #[test]
    fn test_missing_tool_is_hash_error() {
        let hasher = PrefetchHasher::new("definitely-not-a-real-prefetch-tool-12345");
        let err = hasher.compute_hash("https://dl/a.dmg").unwrap_err();
        assert!(matches!(err, SyncError::HashComputation { .. }));
    }

    #[cfg(unix)]
    mod scripted_tool {
        use super::*;
        use tempfile::TempDir;

        /// A fake prefetch tool run through `sh`, so the script never needs
        /// to be executable itself.
        fn fake_tool(dir: &TempDir, body: &str) -> PrefetchHasher {
            let path = dir.path().join("fake-prefetch.sh");
            std::fs::write(&path, format!("{}\n", body)).unwrap();
            PrefetchHasher::with_leading_args("sh", vec![path.to_string_lossy().to_string()])
        }

        #[test]
        fn test_stdout_becomes_prefixed_hash() {
            let dir = TempDir::new().unwrap();
            let hasher = fake_tool(&dir, "echo 0abc123");

            let hash = hasher.compute_hash("https://dl/zen.macos-universal.dmg").unwrap();

            assert_eq!(hash, "sha256:0abc123");
        }

        #[test]
        fn test_archive_invocation_passes_unpack() {
            let dir = TempDir::new().unwrap();
            // Echo the arguments back so the test can see them
            let hasher = fake_tool(&dir, r#"echo "$*""#);

            let hash = hasher.compute_hash("https://dl/zen.linux-x86_64.tar.xz").unwrap();

            assert_eq!(
                hash,
                "sha256:--type sha256 --unpack https://dl/zen.linux-x86_64.tar.xz"
            );
        }

        #[test]
        fn test_nonzero_exit_carries_stderr() {
            let dir = TempDir::new().unwrap();
            let hasher = fake_tool(&dir, "echo 'error: unable to download' >&2\nexit 1");

            let err = hasher.compute_hash("https://dl/a.tar.xz").unwrap_err();

            match err {
                SyncError::HashComputation { stderr, .. } => {
                    assert_eq!(stderr, "error: unable to download");
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[test]
        fn test_empty_output_is_error() {
            let dir = TempDir::new().unwrap();
            let hasher = fake_tool(&dir, "exit 0");

            assert!(hasher.compute_hash("https://dl/a.dmg").is_err());
        }
    }
}
