//! Process-wide durable key-value state.
//!
//! Values are token lists keyed by name. The file-backed store keeps every
//! key it finds on disk, so keys written by other versions survive a save.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("preferences I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("preferences at {path} are not valid: {reason}")]
    Parse { path: PathBuf, reason: String },
}

pub trait PreferenceStore {
    /// Token list stored under `key`, or `None` when the key is absent.
    fn tokens(&self, key: &str) -> Option<Vec<Vec<u8>>>;

    /// Replace the token list under `key`.
    fn set_tokens(&mut self, key: &str, tokens: Vec<Vec<u8>>) -> Result<(), PreferenceError>;
}

/// In-memory preferences, for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, Vec<Vec<u8>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn tokens(&self, key: &str) -> Option<Vec<Vec<u8>>> {
        self.values.get(key).cloned()
    }

    fn set_tokens(&mut self, key: &str, tokens: Vec<Vec<u8>>) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), tokens);
        Ok(())
    }
}

/// Preferences stored as a JSON object in a single file.
#[derive(Debug)]
pub struct JsonPreferences {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonPreferences {
    /// Open the preferences file, starting empty if it does not exist.
    ///
    /// An unreadable or corrupt file is reported and replaced on the next save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read_values(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!(error = %e, "starting with empty preferences");
                Map::new()
            }
        };
        Self { path, values }
    }

    fn read_values(path: &Path) -> Result<Map<String, Value>, PreferenceError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(PreferenceError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(values)) => Ok(values),
            Ok(_) => Err(PreferenceError::Parse {
                path: path.to_path_buf(),
                reason: "top level is not an object".to_string(),
            }),
            Err(e) => Err(PreferenceError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    fn write_values(&self) -> Result<(), PreferenceError> {
        let io_err = |source: io::Error| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.values).map_err(|e| {
            PreferenceError::Parse {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;

        // Write to a temp file then rename, so a crash never leaves half a file
        let temp_file = self.path.with_extension("tmp");
        fs::write(&temp_file, json).map_err(io_err)?;
        fs::rename(&temp_file, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferences {
    fn tokens(&self, key: &str) -> Option<Vec<Vec<u8>>> {
        let value = self.values.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                warn!(key, error = %e, "ignoring preference with unexpected shape");
                None
            }
        }
    }

    fn set_tokens(&mut self, key: &str, tokens: Vec<Vec<u8>>) -> Result<(), PreferenceError> {
        let value = serde_json::to_value(tokens).map_err(|e| PreferenceError::Parse {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        self.values.insert(key.to_string(), value);
        self.write_values()
    }
}
