//! Shared filesystem helpers for the folder store and the cleanup engine.

use rayon::prelude::*;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// On-disk space consumed by a file, which can differ from its logical length.
///
/// Unix reports allocation in 512-byte blocks regardless of the filesystem
/// block size.
#[cfg(unix)]
pub fn allocated_size(meta: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.blocks().saturating_mul(512)
}

#[cfg(not(unix))]
pub fn allocated_size(meta: &Metadata) -> u64 {
    meta.len()
}

/// Sum the allocated size of every regular file under `path`.
///
/// - A regular file passed directly counts itself
/// - Directories, symlinks and other entries contribute 0
/// - Symlinks are never followed, including at the root
/// - Entries whose metadata cannot be read contribute 0 and never abort the sum
pub fn calculate_allocated_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .follow_root_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .par_bridge()
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .metadata()
                .map(|meta| allocated_size(&meta))
                .unwrap_or(0)
        })
        .sum()
}

/// Remove a file, symlink or directory tree.
///
/// Symlinks are removed themselves; their targets are left alone.
pub fn remove_path(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Last path component of `path`, falling back to the whole string for roots.
pub fn last_component(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Key used to order folders: case-insensitive last path component.
pub fn folder_sort_key(path: &str) -> String {
    last_component(path).to_lowercase()
}

/// Make a user-supplied path absolute against the current directory.
pub fn to_absolute(path: &Path) -> io::Result<PathBuf> {
    std::path::absolute(path)
}

/// True if `target` stays inside the folder it is joined to.
pub fn is_contained_relative(target: &str) -> bool {
    let path = Path::new(target);
    !target.trim().is_empty()
        && path
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)))
}
