//! Full Disk Access check.
//!
//! There is no public API that answers "does this process have Full Disk
//! Access", so this probes locations the OS protects: first a directory
//! listing, then a file read as a fallback. Either succeeding counts as
//! access. This is a best-effort heuristic; a denied probe can also mean the
//! probe target does not exist on this system.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Locations probed to detect elevated filesystem access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessProbe {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl AccessProbe {
    /// Protected locations for the current platform.
    ///
    /// macOS guards the TCC database directory and the Time Machine
    /// preferences behind Full Disk Access. Other platforms have no
    /// equivalent gate, so the probe is empty and always passes.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self {
                dirs: vec![PathBuf::from("/Library/Application Support/com.apple.TCC")],
                files: vec![PathBuf::from(
                    "/Library/Preferences/com.apple.TimeMachine.plist",
                )],
            }
        } else {
            Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

/// Probe protected locations. Read-only; never modifies anything.
pub fn check_access(probe: &AccessProbe) -> bool {
    if probe.is_empty() {
        return true;
    }

    for dir in &probe.dirs {
        match fs::read_dir(dir) {
            Ok(_) => return true,
            Err(e) => debug!(path = %dir.display(), error = %e, "directory probe denied"),
        }
    }

    for file in &probe.files {
        match fs::read(file) {
            Ok(_) => return true,
            Err(e) => debug!(path = %file.display(), error = %e, "file probe denied"),
        }
    }

    false
}

/// Run `check_access` on a background thread and hand the answer to `on_done`.
///
/// Overlapping checks are allowed; each one reports independently.
pub fn spawn_access_check<F>(probe: AccessProbe, on_done: F) -> JoinHandle<()>
where
    F: FnOnce(bool) + Send + 'static,
{
    thread::spawn(move || on_done(check_access(&probe)))
}

/// Where the user grants Full Disk Access.
pub fn settings_hint() -> &'static str {
    "System Settings > Privacy & Security > Full Disk Access\nAdd this app (or your terminal) to the list and switch it on."
}

/// URL that opens the Full Disk Access pane on macOS.
pub fn settings_url() -> &'static str {
    "x-apple.systempreferences:com.apple.preference.security?Privacy_AllFiles"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use tempfile::TempDir;

    #[test]
    fn test_empty_probe_grants() {
        assert!(check_access(&AccessProbe::default()));
    }

    #[test]
    fn test_readable_dir_grants() {
        let temp_dir = TempDir::new().unwrap();
        let probe = AccessProbe {
            dirs: vec![temp_dir.path().to_path_buf()],
            files: vec![],
        };
        assert!(check_access(&probe));
    }

    #[test]
    fn test_file_fallback_grants() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("TimeMachine.plist");
        fs::write(&file, "<plist/>").unwrap();
        let probe = AccessProbe {
            dirs: vec![temp_dir.path().join("missing")],
            files: vec![file],
        };
        assert!(check_access(&probe));
    }

    #[test]
    fn test_both_probes_failing_denies() {
        let temp_dir = TempDir::new().unwrap();
        let probe = AccessProbe {
            dirs: vec![temp_dir.path().join("missing-dir")],
            files: vec![temp_dir.path().join("missing-file")],
        };
        assert!(!check_access(&probe));
    }

    #[test]
    fn test_spawned_check_reports_back() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_access_check(AccessProbe::default(), move |granted| {
            let _ = tx.send(granted);
        });
        handle.join().unwrap();
        assert!(rx.recv().unwrap());
    }

    #[test]
    fn test_platform_default_shape() {
        let probe = AccessProbe::platform_default();
        if cfg!(target_os = "macos") {
            assert_eq!(probe.dirs.len(), 1);
            assert_eq!(probe.files.len(), 1);
        } else {
            assert!(probe.is_empty());
        }
    }
}
