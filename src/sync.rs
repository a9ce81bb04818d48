//! The release-sync pipeline
//!
//! `fetch_latest_release -> resolve_assets -> compute_hashes -> render -> write`
//!
//! Each stage takes and returns plain values. Nothing is written until every
//! stage has succeeded, so a failed run leaves the output file untouched.

use crate::core::config::SyncConfig;
use crate::core::error::{Result, SyncError};
use crate::core::fs_utils;
use crate::core::output;
use crate::hash::AssetHasher;
use crate::manifest::{self, OutputBackend, PlatformHash};
use crate::release::{self, Asset, Platform};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub version: String,
    /// Platforms that were resolved and hashed
    pub hashes: Vec<PlatformHash>,
    /// Platforms with no matching asset
    pub skipped: Vec<Platform>,
    /// The text that was (or, in a dry run, would have been) written
    pub rendered: String,
    pub output: PathBuf,
    pub written: bool,
}

/// Run the pipeline with the hasher selected in `config`.
pub fn run(config: &SyncConfig) -> Result<SyncOutcome> {
    let hasher = config.hasher.build(&config.prefetch_tool);
    run_with_hasher(config, hasher.as_ref())
}

/// Run the pipeline with an explicit hasher.
pub fn run_with_hasher(config: &SyncConfig, hasher: &dyn AssetHasher) -> Result<SyncOutcome> {
    output::action(&format!("Fetching latest release of {}", config.repo));
    let release = release::fetch_latest_release(&config.repo, &config.api_base)?;

    let version = if config.trim_version_prefix {
        release::parse_version(&release.tag_name)
    } else {
        release.tag_name.clone()
    };
    output::info(&format!("Latest version: {}", version));

    // Read the recipe up front so a missing file fails before any download
    let existing = match config.backend {
        OutputBackend::Recipe => Some(std::fs::read_to_string(&config.output).map_err(|source| {
            SyncError::ReadOutput {
                path: config.output.clone(),
                source,
            }
        })?),
        OutputBackend::Manifest => None,
    };

    let resolved = release::resolve_assets(&release, &config.patterns);
    let skipped: Vec<Platform> = config
        .patterns
        .keys()
        .filter(|p| !resolved.contains_key(*p))
        .copied()
        .collect();

    let hashes = compute_hashes(&resolved, hasher)?;

    let rendered = match existing {
        Some(text) => manifest::render_recipe(&text, &version, &hashes),
        None => manifest::render_manifest(&version, &hashes)?,
    };

    let written = if config.dry_run {
        output::info(&format!("Dry run, not writing {}", config.output.display()));
        print!("{}", rendered);
        false
    } else {
        fs_utils::atomic_write(&config.output, &rendered)?;
        true
    };

    Ok(SyncOutcome {
        version,
        hashes,
        skipped,
        rendered,
        output: config.output.clone(),
        written,
    })
}

/// Hash every resolved asset, one platform at a time.
///
/// The first failure aborts; no partial result is returned.
pub fn compute_hashes(
    resolved: &BTreeMap<Platform, &Asset>,
    hasher: &dyn AssetHasher,
) -> Result<Vec<PlatformHash>> {
    let total = resolved.len();
    let mut hashes = Vec::with_capacity(total);

    for (i, (platform, asset)) in resolved.iter().enumerate() {
        output::action_numbered(i + 1, total, &format!("{} ({})", platform, asset.name));
        let sha256 = hasher.compute_hash(&asset.browser_download_url)?;
        output::detail(&format!("{} -> {}", platform, sha256));

        hashes.push(PlatformHash {
            platform: *platform,
            url: asset.browser_download_url.clone(),
            sha256,
        });
    }

    Ok(hashes)
}
