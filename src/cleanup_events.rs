//! Progress events emitted while a cleanup run walks folders and targets.

use std::path::PathBuf;

/// Real-time updates from a cleanup run, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupEvent {
    /// A folder is now being processed.
    FolderStarted { folder: PathBuf, name: String },

    /// A target does not exist under the current folder.
    TargetMissing { folder: PathBuf, target: String },

    /// A target was removed. `bytes` is its allocated size before removal.
    TargetDeleted {
        folder: PathBuf,
        target: String,
        bytes: u64,
    },

    /// A target existed but could not be removed.
    TargetFailed {
        folder: PathBuf,
        target: String,
        bytes: u64,
        error: String,
    },

    /// Every folder has been processed.
    Finished {
        deleted_count: usize,
        failed_count: usize,
        total_bytes_freed: u64,
    },
}

impl CleanupEvent {
    /// Folder name to show as "currently processing", if this event starts one.
    pub fn processing_name(&self) -> Option<&str> {
        match self {
            CleanupEvent::FolderStarted { name, .. } => Some(name),
            _ => None,
        }
    }
}
