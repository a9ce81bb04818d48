//! release-sync CLI
//!
//! Usage:
//!   release-sync                         Patch ./flake.nix from the latest release
//!   release-sync --backend manifest      Write ./versions.json instead
//!   release-sync --hasher prefetch       Hash with nix-prefetch-url
//!   release-sync --dry-run               Print the result without writing

use anyhow::{Context, Result};
use clap::Parser;
use release_sync::config::{self, Overrides};
use release_sync::release::PatternSet;
use release_sync::{HashStrategy, OutputBackend, SyncConfig, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "release-sync")]
#[command(about = "Update a recipe or manifest with the latest upstream release and its hashes")]
#[command(version)]
struct Cli {
    /// Config file (default: ./release-sync.toml, then $XDG_CONFIG_HOME/release-sync/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upstream repository in owner/name form
    #[arg(long)]
    repo: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "RELEASE_SYNC_API_BASE", hide_env_values = true)]
    api_base: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    backend: Option<OutputBackend>,

    /// File to update (default depends on the backend)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How asset hashes are computed
    #[arg(long, value_enum)]
    hasher: Option<HashStrategy>,

    /// Built-in asset filename patterns
    #[arg(long, value_enum)]
    patterns: Option<PatternSet>,

    /// Print the result instead of writing it
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let file = config::load(cli.config.as_deref()).context("Failed to load config")?;
    let overrides = Overrides {
        repo: cli.repo,
        api_base: cli.api_base,
        backend: cli.backend,
        output: cli.output,
        hasher: cli.hasher,
        pattern_set: cli.patterns,
        dry_run: cli.dry_run,
    };
    let config = SyncConfig::resolve(file, overrides)?;

    let outcome = release_sync::run(&config)
        .with_context(|| format!("Failed to sync {}", config.repo))?;

    if !outcome.skipped.is_empty() {
        let names: Vec<String> = outcome.skipped.iter().map(|p| p.to_string()).collect();
        output::warning(&format!("skipped platforms: {}", names.join(", ")));
    }

    if outcome.written {
        output::success(&format!("{} has been updated", outcome.output.display()));
    }
    output::success(&format!("New version: {}", outcome.version));

    Ok(())
}
