//! Release lookup against the GitHub releases API
//!
//! ## GitHub Authentication
//!
//! Set `GITHUB_TOKEN` to raise the API rate limit:
//! ```bash
//! export GITHUB_TOKEN="ghp_xxxxxxxxxxxxxxxxxxxx"
//! ```

pub mod platform;

pub use platform::{Platform, PlatformSpec, PatternSet, find_asset, resolve_assets};

use crate::core::error::{Result, SyncError};
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

/// Default GitHub API base URL
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Upstream repository tracked when nothing else is configured
pub const DEFAULT_REPO: &str = "zen-browser/desktop";

/// Default HTTP timeout in seconds
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// A published release and its attached files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// One downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

/// Get HTTP timeout from `RELEASE_SYNC_HTTP_TIMEOUT` or use the default.
/// Read once per process.
pub(crate) fn http_timeout() -> Duration {
    static TIMEOUT: OnceLock<Duration> = OnceLock::new();
    *TIMEOUT.get_or_init(|| {
        let secs = std::env::var("RELEASE_SYNC_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        // Clamp to 5-300 seconds
        Duration::from_secs(secs.clamp(5, 300))
    })
}

/// Get GitHub token from environment, if set.
fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
}

/// Create a GitHub API request with the expected headers and optional auth.
fn github_request(url: &str) -> ureq::Request {
    let mut request = ureq::get(url)
        .timeout(http_timeout())
        .set("Accept", "application/vnd.github.v3+json")
        .set("User-Agent", concat!("release-sync/", env!("CARGO_PKG_VERSION")));

    if let Some(token) = github_token() {
        request = request.set("Authorization", &format!("Bearer {}", token));
    }

    request
}

/// Fetch the newest published release of `repo` ("owner/name").
///
/// Any transport failure or non-success status is a [`SyncError::Network`].
pub fn fetch_latest_release(repo: &str, api_base: &str) -> Result<Release> {
    let url = format!(
        "{}/repos/{}/releases/latest",
        api_base.trim_end_matches('/'),
        repo
    );

    let response = github_request(&url).call().map_err(|e| match e {
        ureq::Error::Status(403, _) => SyncError::network(
            &url,
            "GitHub API rate limit exceeded. Try again later or set GITHUB_TOKEN.",
        ),
        ureq::Error::Status(404, _) => {
            SyncError::network(&url, format!("Repository '{}' not found", repo))
        }
        ureq::Error::Status(code, _) => {
            SyncError::network(&url, format!("GitHub API returned HTTP {}", code))
        }
        other => SyncError::network(&url, format!("GitHub API request failed: {}", other)),
    })?;

    response
        .into_json::<Release>()
        .map_err(|e| SyncError::InvalidRelease {
            url,
            message: e.to_string(),
        })
}

/// Strip common tag prefixes ("release-", "version-", then "v").
pub fn parse_version(version_str: &str) -> String {
    // Longer prefixes first so "version-" is not eaten by 'v'
    let s = version_str;
    let s = s.strip_prefix("release-").unwrap_or(s);
    let s = s.strip_prefix("version-").unwrap_or(s);
    let s = s.strip_prefix('v').unwrap_or(s);
    s.to_string()
}
