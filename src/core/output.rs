//! Colored output and progress reporting for release-sync
//!
//! Uses owo-colors for terminal colors and indicatif for progress bars.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Standard spinner characters
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Standard tick interval for spinners
const TICK_INTERVAL_MS: u64 = 80;

const BYTES_TEMPLATE: &str =
    "     {spinner:.cyan} [{bar:30.cyan/dim}] {bytes}/{total_bytes} ({eta})";

/// Print an action header (blue, bold)
/// Example: "==> Fetching latest release of zen-browser/desktop"
pub fn action(message: &str) {
    println!("{} {}", "==>".blue().bold(), message.bold());
}

/// Print a platform counter line
/// Example: "(1/4) x86_64-linux"
pub fn action_numbered(current: usize, total: usize, message: &str) {
    println!(
        "{} {}",
        format!("({}/{})", current, total).cyan(),
        message.bold()
    );
}

/// Print a detail line (dimmed prefix)
/// Example: "     hashing https://..."
pub fn detail(message: &str) {
    println!("     {}", message.dimmed());
}

/// Print a success message (green)
pub fn success(message: &str) {
    println!("{} {}", "==>".green().bold(), message.green());
}

/// Print an info message (cyan)
pub fn info(message: &str) {
    println!("{} {}", "::".cyan(), message);
}

/// Print a warning message (yellow)
pub fn warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
}

/// Print an error message (red)
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
}

/// Create a spinner with standard styling.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("     {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(SPINNER_CHARS),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(TICK_INTERVAL_MS));
    pb
}

/// Upgrade a spinner to a byte progress bar once the content length is known.
pub fn upgrade_to_bytes(pb: &ProgressBar, total_bytes: u64) {
    pb.set_length(total_bytes);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(BYTES_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸━"),
    );
}

/// RAII guard that clears a progress bar when dropped.
///
/// Keeps the terminal clean when a download bails out halfway with `?`.
pub struct ProgressGuard<'a>(&'a ProgressBar);

impl<'a> ProgressGuard<'a> {
    pub fn new(pb: &'a ProgressBar) -> Self {
        Self(pb)
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}
