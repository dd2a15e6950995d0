//! Folder record store.
//!
//! Keeps the folders the user wants managed, deduplicated by path and sorted
//! by case-insensitive folder name. Every change rewrites the full token
//! list in the preference store.

use crate::bookmarks::BookmarkStore;
use crate::preferences::PreferenceStore;
use crate::utils;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Preference key holding the ordered token list.
pub const BOOKMARKS_KEY: &str = "selectedFoldersBookmarks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderRecord {
    pub id: Uuid,
    pub path: String,
    pub activated: bool,
}

impl FolderRecord {
    fn new(path: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
            activated: true,
        }
    }

    /// Folder name shown to the user.
    pub fn name(&self) -> String {
        utils::last_component(&self.path)
    }

    pub fn path_buf(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

pub struct FolderStore {
    records: Vec<FolderRecord>,
    bookmarks: Box<dyn BookmarkStore>,
    preferences: Box<dyn PreferenceStore>,
    has_loaded_persisted: bool,
}

impl FolderStore {
    pub fn new(bookmarks: Box<dyn BookmarkStore>, preferences: Box<dyn PreferenceStore>) -> Self {
        Self {
            records: Vec::new(),
            bookmarks,
            preferences,
            has_loaded_persisted: false,
        }
    }

    pub fn folders(&self) -> &[FolderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&FolderRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn find_by_path(&self, path: &str) -> Option<&FolderRecord> {
        self.records.iter().find(|r| r.path == path)
    }

    /// Paths of activated folders, in collection order.
    pub fn active_paths(&self) -> Vec<PathBuf> {
        self.records
            .iter()
            .filter(|r| r.activated)
            .map(FolderRecord::path_buf)
            .collect()
    }

    pub fn preferences(&self) -> &dyn PreferenceStore {
        self.preferences.as_ref()
    }

    /// Add folders not already present, activated. Returns how many were added.
    pub fn add_folders<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut seen_input = false;
        let mut added = 0;

        for path in paths {
            seen_input = true;
            let path = path.as_ref().to_string_lossy().into_owned();
            if self.records.iter().any(|r| r.path == path) {
                debug!(path = %path, "folder already selected");
                continue;
            }
            self.records.push(FolderRecord::new(path));
            added += 1;
        }

        if !seen_input {
            return 0;
        }

        self.sort();
        self.persist();
        added
    }

    /// Remove the record with `id`. Returns whether one was removed.
    pub fn remove_folder(&mut self, id: Uuid) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        self.persist();
        removed
    }

    /// Remove records by position. Out-of-range indices are ignored.
    pub fn remove_folders_at(&mut self, indices: &[usize]) -> usize {
        let before = self.records.len();
        let mut index = 0;
        self.records.retain(|_| {
            let keep = !indices.contains(&index);
            index += 1;
            keep
        });
        let removed = before - self.records.len();
        self.persist();
        removed
    }

    /// Flip `activated` on the record with `id`, returning the new value.
    pub fn toggle_activation(&mut self, id: Uuid) -> Option<bool> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        record.activated = !record.activated;
        let activated = record.activated;
        self.persist();
        Some(activated)
    }

    /// Set `activated` on the record with `id` for this session only.
    ///
    /// Activation is not part of the saved tokens, so preferences are left
    /// untouched. Returns the previous value.
    pub fn set_activated(&mut self, id: Uuid, activated: bool) -> Option<bool> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        Some(std::mem::replace(&mut record.activated, activated))
    }

    /// Restore folders from persisted tokens, once per store.
    ///
    /// Tokens that no longer resolve are dropped without surfacing an error;
    /// they disappear from the next save. Returns the number of folders
    /// restored, or 0 if already loaded.
    pub fn load_persisted_if_needed(&mut self) -> usize {
        if self.has_loaded_persisted {
            return 0;
        }
        self.has_loaded_persisted = true;

        let Some(stored) = self.preferences.tokens(BOOKMARKS_KEY) else {
            return 0;
        };

        let mut resolved = Vec::with_capacity(stored.len());
        for token in &stored {
            match self.bookmarks.resolve(token) {
                Ok(path) => {
                    if !self.bookmarks.start_access(&path) {
                        debug!(path = %path.display(), "could not start access to folder");
                    }
                    resolved.push(FolderRecord::new(path.to_string_lossy().into_owned()));
                }
                Err(e) => warn!(error = %e, "dropping saved folder"),
            }
        }

        let restored = resolved.len();
        self.records = resolved;
        self.sort();
        restored
    }

    fn sort(&mut self) {
        self.records
            .sort_by_cached_key(|r| utils::folder_sort_key(&r.path));
    }

    fn persist(&mut self) {
        let tokens: Vec<Vec<u8>> = self
            .records
            .iter()
            .filter_map(|r| match self.bookmarks.derive(Path::new(&r.path)) {
                Ok(token) => Some(token),
                Err(e) => {
                    warn!(error = %e, "folder will not be remembered");
                    None
                }
            })
            .collect();

        if let Err(e) = self.preferences.set_tokens(BOOKMARKS_KEY, tokens) {
            warn!(error = %e, "failed to save selected folders");
        }
    }
}
