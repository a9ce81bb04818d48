//! Run configuration
//!
//! Settings are layered: built-in defaults, then a TOML file, then command
//! line overrides. The file is looked up in this order:
//!
//! 1. the path given with `--config`
//! 2. `./release-sync.toml`
//! 3. `$XDG_CONFIG_HOME/release-sync/config.toml`
//!
//! ```toml
//! repo = "zen-browser/desktop"
//! backend = "manifest"
//! output = "versions.json"
//! hasher = "prefetch"
//! pattern_set = "legacy"
//!
//! [patterns]
//! "aarch64-linux" = "linux-arm64.tar.bz2"
//! ```

use super::error::{Result, SyncError};
use crate::hash::HashStrategy;
use crate::hash::prefetch::DEFAULT_PREFETCH_TOOL;
use crate::manifest::OutputBackend;
use crate::release::{DEFAULT_REPO, GITHUB_API_BASE, PatternSet, Platform, PlatformSpec};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG_NAME: &str = "release-sync.toml";

/// Contents of a config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub repo: Option<String>,
    pub api_base: Option<String>,
    pub backend: Option<OutputBackend>,
    pub output: Option<PathBuf>,
    pub hasher: Option<HashStrategy>,
    pub prefetch_tool: Option<String>,
    pub pattern_set: Option<PatternSet>,
    pub patterns: Option<BTreeMap<String, String>>,
    pub trim_version_prefix: Option<bool>,
}

/// Values given on the command line; these win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub repo: Option<String>,
    pub api_base: Option<String>,
    pub backend: Option<OutputBackend>,
    pub output: Option<PathBuf>,
    pub hasher: Option<HashStrategy>,
    pub pattern_set: Option<PatternSet>,
    pub dry_run: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub repo: String,
    pub api_base: String,
    pub backend: OutputBackend,
    pub output: PathBuf,
    pub hasher: HashStrategy,
    pub prefetch_tool: String,
    pub patterns: PlatformSpec,
    pub trim_version_prefix: bool,
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let backend = OutputBackend::default();
        Self {
            repo: DEFAULT_REPO.to_string(),
            api_base: GITHUB_API_BASE.to_string(),
            backend,
            output: PathBuf::from(backend.default_path()),
            hasher: HashStrategy::default(),
            prefetch_tool: DEFAULT_PREFETCH_TOOL.to_string(),
            patterns: PatternSet::default().patterns(),
            trim_version_prefix: false,
            dry_run: false,
        }
    }
}

impl SyncConfig {
    /// Layer `file` and then `overrides` on top of the defaults.
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self> {
        let repo = overrides
            .repo
            .or(file.repo)
            .unwrap_or_else(|| DEFAULT_REPO.to_string());
        validate_repo(&repo)?;

        let backend = overrides.backend.or(file.backend).unwrap_or_default();
        let output = overrides
            .output
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(backend.default_path()));

        let mut patterns = overrides
            .pattern_set
            .or(file.pattern_set)
            .unwrap_or_default()
            .patterns();
        for (key, pattern) in file.patterns.unwrap_or_default() {
            let platform: Platform = key.parse().map_err(SyncError::Config)?;
            if pattern.trim().is_empty() {
                return Err(SyncError::Config(format!(
                    "empty asset pattern for {}",
                    platform
                )));
            }
            patterns.insert(platform, pattern);
        }

        Ok(Self {
            repo,
            api_base: overrides
                .api_base
                .or(file.api_base)
                .unwrap_or_else(|| GITHUB_API_BASE.to_string()),
            backend,
            output,
            hasher: overrides.hasher.or(file.hasher).unwrap_or_default(),
            prefetch_tool: file
                .prefetch_tool
                .unwrap_or_else(|| DEFAULT_PREFETCH_TOOL.to_string()),
            patterns,
            trim_version_prefix: file.trim_version_prefix.unwrap_or(false),
            dry_run: overrides.dry_run,
        })
    }
}

fn validate_repo(repo: &str) -> Result<()> {
    let mut parts = repo.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(()),
        _ => Err(SyncError::Config(format!(
            "repository must be in 'owner/name' form, got '{}'",
            repo
        ))),
    }
}

fn xdg_config_home() -> PathBuf {
    if let Ok(raw) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".").join(".config"))
}

/// Locate the config file to use, if any.
///
/// An explicit path must exist; the implicit locations are optional.
pub fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(SyncError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let candidates = [
        PathBuf::from(LOCAL_CONFIG_NAME),
        xdg_config_home().join("release-sync").join("config.toml"),
    ];
    Ok(candidates.into_iter().find(|p| p.is_file()))
}

/// Parse a config file.
pub fn read_config(path: &Path) -> Result<ConfigFile> {
    let text = std::fs::read_to_string(path)?;
    toml::from_str::<ConfigFile>(&text)
        .map_err(|e| SyncError::Config(format!("invalid TOML in {}: {}", path.display(), e)))
}

/// Find and parse the config file, or fall back to an empty one.
pub fn load(explicit: Option<&Path>) -> Result<ConfigFile> {
    match find_config_file(explicit)? {
        Some(path) => read_config(&path),
        None => Ok(ConfigFile::default()),
    }
}
