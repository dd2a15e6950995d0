//! Location tokens for persisted folders.
//!
//! A token is an opaque byte string that can be turned back into a folder
//! path in a later process. The folder store never looks inside a token; it
//! only derives one per folder on save and resolves each one on load. Every
//! token succeeds or fails on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum BookmarkError {
    #[error("cannot create a token for {path}: {reason}")]
    Derive { path: PathBuf, reason: String },

    #[error("token for {path} no longer resolves: {reason}")]
    Resolve { path: PathBuf, reason: String },

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Capability store that turns folder paths into durable tokens and back.
pub trait BookmarkStore {
    fn derive(&self, path: &Path) -> Result<Vec<u8>, BookmarkError>;

    fn resolve(&self, token: &[u8]) -> Result<PathBuf, BookmarkError>;

    /// Begin holding access to a resolved location for the rest of the
    /// process. Returns whether access was obtained.
    fn start_access(&self, path: &Path) -> bool {
        let _ = path;
        true
    }
}

const TOKEN_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    version: u32,
    path: PathBuf,
    created_at: DateTime<Utc>,
}

/// Path-based tokens.
///
/// Tokens carry the absolute folder path and resolve only while that path
/// is still a directory. Locations handed to `start_access` are kept so
/// callers can see which grants the process holds.
#[derive(Debug, Default)]
pub struct PathBookmarks {
    granted: Mutex<Vec<PathBuf>>,
}

impl PathBookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locations this process is currently holding access to.
    pub fn granted(&self) -> Vec<PathBuf> {
        self.granted
            .lock()
            .map(|granted| granted.clone())
            .unwrap_or_default()
    }
}

impl BookmarkStore for PathBookmarks {
    fn derive(&self, path: &Path) -> Result<Vec<u8>, BookmarkError> {
        if !path.is_absolute() {
            return Err(BookmarkError::Derive {
                path: path.to_path_buf(),
                reason: "path is not absolute".to_string(),
            });
        }
        if !path.is_dir() {
            return Err(BookmarkError::Derive {
                path: path.to_path_buf(),
                reason: "not an existing directory".to_string(),
            });
        }

        let payload = TokenPayload {
            version: TOKEN_VERSION,
            path: path.to_path_buf(),
            created_at: Utc::now(),
        };
        serde_json::to_vec(&payload).map_err(|e| BookmarkError::Derive {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn resolve(&self, token: &[u8]) -> Result<PathBuf, BookmarkError> {
        let payload: TokenPayload =
            serde_json::from_slice(token).map_err(|e| BookmarkError::Malformed(e.to_string()))?;

        if payload.version != TOKEN_VERSION {
            return Err(BookmarkError::Malformed(format!(
                "unsupported token version {}",
                payload.version
            )));
        }
        if !payload.path.is_dir() {
            return Err(BookmarkError::Resolve {
                path: payload.path,
                reason: "directory is missing".to_string(),
            });
        }

        Ok(payload.path)
    }

    fn start_access(&self, path: &Path) -> bool {
        let readable = std::fs::read_dir(path).is_ok();
        if readable {
            if let Ok(mut granted) = self.granted.lock() {
                if !granted.iter().any(|p| p == path) {
                    granted.push(path.to_path_buf());
                }
            }
        }
        readable
    }
}
