//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Rows between spinner updates
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// Spinner shown on stderr while files are scanned.
///
/// The spinner is ticked from the scan loop itself; there is no background
/// ticker thread. indicatif hides it when stderr is not a terminal.
#[derive(Debug)]
pub struct ScanProgress {
    pb: Option<ProgressBar>,
}

impl ScanProgress {
    /// Spinner for a scan, or a silent reporter when `enabled` is false
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self {
                pb: Some(create_spinner("Scanning...")),
            }
        } else {
            Self::hidden()
        }
    }

    /// Reporter that never draws anything
    pub fn hidden() -> Self {
        Self { pb: None }
    }

    #[cfg(test)]
    fn is_hidden(&self) -> bool {
        self.pb.is_none()
    }

    /// Announce the file about to be read
    pub fn start_file(&self, path: &Path) {
        if let Some(pb) = &self.pb {
            pb.set_message(format!("Scanning {}...", path.display()));
            pb.tick();
        }
    }

    /// Show the running row count for the current file
    pub fn update_rows(&self, path: &Path, rows: u64) {
        if let Some(pb) = &self.pb {
            pb.set_message(format!("Scanning {}... {} rows", path.display(), rows));
            pb.tick();
        }
    }

    /// Update the spinner message outside of a scan
    pub fn set_message(&self, message: &str) {
        if let Some(pb) = &self.pb {
            pb.set_message(message.to_string());
            pb.tick();
        }
    }

    /// Run `f` with the spinner erased, so anything written to stderr does
    /// not interleave with it
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        match &self.pb {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }

    /// Remove the spinner from the terminal
    pub fn finish(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for ScanProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
