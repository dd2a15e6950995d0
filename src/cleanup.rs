//! Cleanup engine.
//!
//! Walks the active folders in order, and for each folder checks every
//! cleanup target in order. Existing targets are sized, then removed. Every
//! per-target failure is folded into the aggregate counters; the only
//! run-level failure is being asked to clean nothing.

pub mod remover;

use crate::cleanup_events::CleanupEvent;
use crate::utils;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use remover::{remover_for, DryRunRemover, PermanentRemover, Remover, TrashRemover};

/// Build artifacts removed from every Flutter project, in processing order.
pub const DEFAULT_TARGETS: &[&str] = &[
    "build",
    ".dart_tool",
    "pubspec.lock",
    "ios/Pods",
    "ios/Podfile.lock",
    "ios/Gemfile.lock",
];

/// Default targets followed by `extra` ones, skipping duplicates and any
/// target that would escape the project folder.
pub fn cleanup_targets(extra: &[String]) -> Vec<String> {
    let mut targets: Vec<String> = DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect();

    for custom in extra {
        let custom = custom.trim().trim_end_matches('/').to_string();
        if !utils::is_contained_relative(&custom) {
            warn!(target_path = %custom, "ignoring cleanup target outside the project folder");
            continue;
        }
        if !targets.contains(&custom) {
            targets.push(custom);
        }
    }

    targets
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CleanupError {
    #[error("no active folders to clean")]
    NoActiveFolders,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Deleted,
    Failed { error: String },
}

/// What happened to one existing target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetOutcome {
    pub folder: PathBuf,
    pub target: String,
    pub bytes: u64,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

/// Aggregate of one cleanup run.
///
/// `total_bytes_freed` sums the allocated size of every existing target,
/// measured before the removal attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupResult {
    pub deleted_count: usize,
    pub failed_count: usize,
    pub total_bytes_freed: u64,
    pub outcomes: Vec<TargetOutcome>,
}

impl CleanupResult {
    pub fn size_human(&self) -> String {
        bytesize::to_string(self.total_bytes_freed, false)
    }

    pub fn found_anything(&self) -> bool {
        self.deleted_count > 0 || self.failed_count > 0
    }
}

/// Run a cleanup over `folders` without progress reporting.
pub fn run_cleanup(
    folders: &[PathBuf],
    targets: &[String],
    remover: &dyn Remover,
) -> Result<CleanupResult, CleanupError> {
    run_cleanup_with_progress(folders, targets, remover, &mut |_| {})
}

/// Run a cleanup over `folders`, reporting each step through `on_event`.
///
/// Folders are processed in the given order and targets in `targets` order,
/// so the event stream is deterministic.
pub fn run_cleanup_with_progress(
    folders: &[PathBuf],
    targets: &[String],
    remover: &dyn Remover,
    on_event: &mut dyn FnMut(CleanupEvent),
) -> Result<CleanupResult, CleanupError> {
    if folders.is_empty() {
        return Err(CleanupError::NoActiveFolders);
    }

    let mut result = CleanupResult::default();

    for folder in folders {
        let name = utils::last_component(&folder.to_string_lossy());
        debug!(folder = %name, "checking folder");
        on_event(CleanupEvent::FolderStarted {
            folder: folder.clone(),
            name,
        });

        for target in targets {
            clean_target(folder, target, remover, &mut result, on_event);
        }
    }

    info!(
        deleted = result.deleted_count,
        failed = result.failed_count,
        bytes = result.total_bytes_freed,
        "cleanup finished"
    );
    on_event(CleanupEvent::Finished {
        deleted_count: result.deleted_count,
        failed_count: result.failed_count,
        total_bytes_freed: result.total_bytes_freed,
    });

    Ok(result)
}

fn clean_target(
    folder: &Path,
    target: &str,
    remover: &dyn Remover,
    result: &mut CleanupResult,
    on_event: &mut dyn FnMut(CleanupEvent),
) {
    let target_path = folder.join(target);

    if !target_path.exists() {
        debug!(target_path = %target, folder = %folder.display(), "target not found");
        on_event(CleanupEvent::TargetMissing {
            folder: folder.to_path_buf(),
            target: target.to_string(),
        });
        return;
    }

    let bytes = utils::calculate_allocated_size(&target_path);
    result.total_bytes_freed += bytes;
    debug!(target_path = %target, bytes, "target size");

    match remover.remove(&target_path) {
        Ok(()) => {
            result.deleted_count += 1;
            info!(path = %target_path.display(), "{}", remover.verb());
            result.outcomes.push(TargetOutcome {
                folder: folder.to_path_buf(),
                target: target.to_string(),
                bytes,
                status: OutcomeStatus::Deleted,
            });
            on_event(CleanupEvent::TargetDeleted {
                folder: folder.to_path_buf(),
                target: target.to_string(),
                bytes,
            });
        }
        Err(err) => {
            result.failed_count += 1;
            warn!(path = %target_path.display(), error = %err, "failed to delete target");
            result.outcomes.push(TargetOutcome {
                folder: folder.to_path_buf(),
                target: target.to_string(),
                bytes,
                status: OutcomeStatus::Failed {
                    error: err.to_string(),
                },
            });
            on_event(CleanupEvent::TargetFailed {
                folder: folder.to_path_buf(),
                target: target.to_string(),
                bytes,
                error: err.to_string(),
            });
        }
    }
}
