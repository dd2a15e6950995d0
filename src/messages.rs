//! User-facing outcome of a cleanup run.
//!
//! A run produces exactly one message, either an error or a success.

use crate::cleanup::CleanupResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupMessage {
    Success(String),
    Error(String),
}

impl CleanupMessage {
    pub fn from_result(result: &CleanupResult) -> Self {
        if result.deleted_count > 0 {
            let mut text = format!(
                "Cleanup complete!\n\n{} item(s) deleted\n\n{} freed",
                result.deleted_count,
                result.size_human()
            );
            if result.failed_count > 0 {
                text.push_str(&format!("\n{} failure(s)", result.failed_count));
            }
            CleanupMessage::Success(text)
        } else if result.failed_count > 0 {
            CleanupMessage::Error(format!(
                "Nothing was deleted. {} error(s) found.",
                result.failed_count
            ))
        } else {
            CleanupMessage::Success(
                "No build artifacts were found in the selected projects.".to_string(),
            )
        }
    }

    pub fn no_active_folders() -> Self {
        CleanupMessage::Error("No active folders to clean.".to_string())
    }

    pub fn text(&self) -> &str {
        match self {
            CleanupMessage::Success(text) | CleanupMessage::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CleanupMessage::Error(_))
    }
}
