//! Deletion strategies.
//!
//! The engine only knows that a target can be removed or not; whether that
//! means unlinking it, moving it to the trash or just pretending is decided
//! here.

use crate::trash_ops;
use crate::utils;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Removes one existing cleanup target.
pub trait Remover: Send + Sync {
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Past-tense verb used in progress output.
    fn verb(&self) -> &'static str {
        "deleted"
    }
}

/// Deletes targets permanently, recursing into directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermanentRemover;

impl Remover for PermanentRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        utils::remove_path(path)
    }
}

/// Moves targets to the platform trash.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrashRemover;

impl Remover for TrashRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        trash_ops::delete(path)
    }

    fn verb(&self) -> &'static str {
        "trashed"
    }
}

/// Leaves the filesystem untouched and reports every target as removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRemover;

impl Remover for DryRunRemover {
    fn remove(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn verb(&self) -> &'static str {
        "would delete"
    }
}

/// Pick the strategy for a run. Dry run wins over trash.
pub fn remover_for(use_trash: bool, dry_run: bool) -> Arc<dyn Remover> {
    if dry_run {
        Arc::new(DryRunRemover)
    } else if use_trash {
        Arc::new(TrashRemover)
    } else {
        Arc::new(PermanentRemover)
    }
}
