//! Platform keys and asset selection
//!
//! Each of the four supported targets is mapped to a filename substring.
//! The first asset in release order whose name contains that substring is
//! the platform's asset.

use super::{Asset, Release};
use crate::core::output;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A supported platform target, named the way Nix names systems.
///
/// Declaration order is processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "x86_64-linux")]
    X86_64Linux,
    #[serde(rename = "aarch64-linux")]
    Aarch64Linux,
    #[serde(rename = "aarch64-darwin")]
    Aarch64Darwin,
    #[serde(rename = "x86_64-darwin")]
    X86_64Darwin,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::X86_64Linux,
        Platform::Aarch64Linux,
        Platform::Aarch64Darwin,
        Platform::X86_64Darwin,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::X86_64Linux => "x86_64-linux",
            Self::Aarch64Linux => "aarch64-linux",
            Self::Aarch64Darwin => "aarch64-darwin",
            Self::X86_64Darwin => "x86_64-darwin",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| format!("unknown platform '{}'", s))
    }
}

/// Platform key to filename substring.
pub type PlatformSpec = BTreeMap<Platform, String>;

/// Built-in filename pattern sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PatternSet {
    /// Generic OS/arch suffixes, one dmg per macOS architecture
    Legacy,
    /// Product-branded filenames with a universal macOS dmg
    #[default]
    Branded,
}

impl PatternSet {
    pub fn patterns(&self) -> PlatformSpec {
        let pairs: [(Platform, &str); 4] = match self {
            Self::Legacy => [
                (Platform::X86_64Linux, "linux-x86_64.tar.bz2"),
                (Platform::Aarch64Linux, "linux-aarch64.tar.bz2"),
                (Platform::Aarch64Darwin, "macos-aarch64.dmg"),
                (Platform::X86_64Darwin, "macos-x86_64.dmg"),
            ],
            Self::Branded => [
                (Platform::X86_64Linux, "zen.linux-x86_64.tar.xz"),
                (Platform::Aarch64Linux, "zen.linux-aarch64.tar.xz"),
                (Platform::Aarch64Darwin, "zen.macos-universal.dmg"),
                (Platform::X86_64Darwin, "zen.macos-universal.dmg"),
            ],
        };
        pairs
            .into_iter()
            .map(|(p, pattern)| (p, pattern.to_string()))
            .collect()
    }
}

/// Select the first asset whose name contains `pattern`.
pub fn find_asset<'a>(assets: &'a [Asset], pattern: &str) -> Option<&'a Asset> {
    assets.iter().find(|a| a.name.contains(pattern))
}

/// Resolve an asset for every platform in `patterns`.
///
/// Platforms with no matching asset are warned about and left out of the
/// result; this never fails.
pub fn resolve_assets<'a>(release: &'a Release, patterns: &PlatformSpec) -> BTreeMap<Platform, &'a Asset> {
    let mut resolved = BTreeMap::new();
    for (platform, pattern) in patterns {
        match find_asset(&release.assets, pattern) {
            Some(asset) => {
                resolved.insert(*platform, asset);
            }
            None => output::warning(&format!(
                "no asset matching '{}' found for {}",
                pattern, platform
            )),
        }
    }
    resolved
}
