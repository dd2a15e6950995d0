use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Braille spinner frames, same as indicatif's default dots.
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Create a spinner for indeterminate progress
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars(SPINNER_CHARS)
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Create a spinner that stays invisible, for quiet and JSON output
pub fn create_hidden() -> ProgressBar {
    ProgressBar::hidden()
}

/// Show which folder the cleanup is working on
pub fn set_processing(pb: &ProgressBar, folder: &str) {
    pb.set_message(format!("Running cleanup... {}", folder));
}

/// Finish and clear progress bar
pub fn finish_and_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}
