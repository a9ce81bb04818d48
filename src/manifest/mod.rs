//! Output back-ends
//!
//! - `recipe`: patch an existing build recipe in place ([`patch`]).
//! - `manifest`: write a fresh JSON [`VersionRecord`] ([`record`]).

pub mod patch;
pub mod record;

pub use patch::{Patched, update_hash, update_version};
pub use record::{PlatformEntry, VersionRecord};

use crate::core::error::Result;
use crate::core::output;
use crate::release::Platform;
use serde::Deserialize;

/// Where and how the new version is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputBackend {
    /// Patch anchors in an existing build recipe
    #[default]
    Recipe,
    /// Overwrite a JSON manifest
    Manifest,
}

impl OutputBackend {
    pub fn default_path(&self) -> &'static str {
        match self {
            Self::Recipe => "flake.nix",
            Self::Manifest => "versions.json",
        }
    }
}

/// A platform whose asset was resolved and hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformHash {
    pub platform: Platform,
    pub url: String,
    pub sha256: String,
}

/// Apply the version and every hash to recipe text.
///
/// Missing anchors are reported as warnings; the affected value is left
/// as it was.
pub fn render_recipe(existing: &str, version: &str, hashes: &[PlatformHash]) -> String {
    let patched = update_version(existing, version);
    if !patched.applied {
        output::warning(&format!(
            "no '{}' anchor followed by a version assignment; version left unchanged",
            patch::VERSION_ANCHOR
        ));
    }

    hashes.iter().fold(patched.content, |content, h| {
        let patched = update_hash(&content, h.platform, &h.sha256);
        if !patched.applied {
            output::warning(&format!(
                "no '{}' anchor in the {} block; hash left unchanged",
                patch::HASH_ANCHOR,
                h.platform
            ));
        }
        patched.content
    })
}

/// Build a fresh manifest from the resolved hashes.
pub fn render_manifest(version: &str, hashes: &[PlatformHash]) -> Result<String> {
    let mut record = VersionRecord::new(version);
    for h in hashes {
        record.insert(h.platform, h.url.clone(), h.sha256.clone());
    }
    record.to_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(platform: Platform, sha: &str) -> PlatformHash {
        PlatformHash {
            platform,
            url: format!("https://dl/{}", platform),
            sha256: sha.to_string(),
        }
    }

    #[test]
    fn test_render_recipe_applies_all() {
        let recipe = "#:version:\nversion = \"0\";\n\"x86_64-linux\" = {\n#:sha256:\nsha256 = \"old\";\n};\n\"x86_64-darwin\" = {\n#:sha256:\nsha256 = \"old\";\n};\n";
        let out = render_recipe(
            recipe,
            "1.2.3",
            &[
                hash(Platform::X86_64Linux, "sha256:linux"),
                hash(Platform::X86_64Darwin, "sha256:mac"),
            ],
        );

        assert!(out.contains("    version = \"1.2.3\";"));
        assert!(out.contains("        sha256 = \"sha256:linux\";"));
        assert!(out.contains("        sha256 = \"sha256:mac\";"));
        assert!(!out.contains("\"old\""));
    }

    #[test]
    fn test_render_recipe_leaves_unhashed_platform_alone() {
        let recipe = "\"aarch64-linux\" = {\n#:sha256:\nsha256 = \"old\";\n};";
        let out = render_recipe(recipe, "1.0", &[]);
        assert_eq!(out, recipe);
    }

    #[test]
    fn test_render_manifest_contains_only_given_platforms() {
        let json = render_manifest("2.0", &[hash(Platform::Aarch64Linux, "sha256:x")]).unwrap();
        let record: VersionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record.version, "2.0");
        assert_eq!(record.platforms.len(), 1);
        assert_eq!(record.platforms[&Platform::Aarch64Linux].sha256, "sha256:x");
    }

    #[test]
    fn test_default_paths() {
        assert_eq!(OutputBackend::Recipe.default_path(), "flake.nix");
        assert_eq!(OutputBackend::Manifest.default_path(), "versions.json");
    }
}
