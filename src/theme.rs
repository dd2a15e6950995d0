//! Terminal styling for human-readable output.
//!
//! `colored` drops the escape codes on its own when stdout is not a
//! terminal or `NO_COLOR` is set.

use colored::Colorize;

pub struct Theme;

impl Theme {
    pub fn header(text: &str) -> String {
        text.bold().to_string()
    }

    pub fn muted(text: &str) -> String {
        text.dimmed().to_string()
    }

    pub fn success(text: &str) -> String {
        text.green().to_string()
    }

    pub fn warning(text: &str) -> String {
        text.yellow().to_string()
    }

    pub fn error(text: &str) -> String {
        text.red().bold().to_string()
    }

    pub fn command(text: &str) -> String {
        text.cyan().to_string()
    }

    pub fn size(text: &str) -> String {
        text.bold().to_string()
    }

    pub fn status_active(text: &str) -> String {
        text.green().to_string()
    }

    pub fn status_inactive(text: &str) -> String {
        text.dimmed().to_string()
    }

    pub fn divider(width: usize) -> String {
        "-".repeat(width)
    }

    pub fn divider_bold(width: usize) -> String {
        "=".repeat(width)
    }
}
