//! Structured version manifest (JSON)

use crate::core::error::Result;
use crate::release::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Download location and hash for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub url: String,
    pub sha256: String,
}

/// The full manifest. Always built from scratch; prior file content is
/// never merged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version: String,
    pub platforms: BTreeMap<Platform, PlatformEntry>,
}

impl VersionRecord {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            platforms: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, platform: Platform, url: impl Into<String>, sha256: impl Into<String>) {
        self.platforms.insert(
            platform,
            PlatformEntry {
                url: url.into(),
                sha256: sha256.into(),
            },
        );
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self).map_err(std::io::Error::from)?;
        json.push('\n');
        Ok(json)
    }
}
