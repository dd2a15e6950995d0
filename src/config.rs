use crate::access::AccessProbe;
use crate::cleanup;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that relocates config and preferences into one directory.
pub const HOME_ENV: &str = "FLUTTER_SWEEP_HOME";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cleanup: CleanupSettings,

    #[serde(default)]
    pub access: AccessSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupSettings {
    /// Extra relative paths removed after the built-in targets
    #[serde(default)]
    pub extra_targets: Vec<String>,

    /// Move targets to the trash instead of deleting them
    #[serde(default)]
    pub use_trash: bool,

    /// Ask before cleaning
    #[serde(default = "default_confirm")]
    pub confirm: bool,
}

/// Overrides for the Full Disk Access probe. `None` keeps the platform default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_dirs: Option<Vec<PathBuf>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_files: Option<Vec<PathBuf>>,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            extra_targets: Vec::new(),
            use_trash: false,
            confirm: default_confirm(),
        }
    }
}

fn default_confirm() -> bool {
    true
}

/// Where config and preferences live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub config_file: PathBuf,
    pub preferences_file: PathBuf,
}

impl StoragePaths {
    /// Both files inside one directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            config_file: dir.join("config.toml"),
            preferences_file: dir.join("preferences.json"),
        }
    }

    /// Resolve storage: explicit `home`, then `FLUTTER_SWEEP_HOME`, then the
    /// platform config and data directories.
    pub fn resolve(home: Option<&Path>) -> Result<Self> {
        if let Some(home) = home {
            return Ok(Self::in_dir(home));
        }
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::in_dir(Path::new(&home)));
        }

        let dirs = directories::ProjectDirs::from("dev", "flutter-sweep", "flutter-sweep")
            .context("Could not determine the home directory")?;
        Ok(Self {
            config_file: dirs.config_dir().join("config.toml"),
            preferences_file: dirs.data_dir().join("preferences.json"),
        })
    }
}

impl Config {
    /// Load config from `path` or return defaults
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml).context("Failed to write config file")?;

        Ok(())
    }

    /// Apply CLI option overrides
    pub fn apply_cli_overrides(&mut self, use_trash: bool, yes: bool) {
        if use_trash {
            self.cleanup.use_trash = true;
        }
        if yes {
            self.cleanup.confirm = false;
        }
    }

    /// Built-in targets followed by the configured extras.
    pub fn targets(&self) -> Vec<String> {
        cleanup::cleanup_targets(&self.cleanup.extra_targets)
    }

    /// Probe for the permission gate, with any configured overrides applied.
    pub fn access_probe(&self) -> AccessProbe {
        let mut probe = AccessProbe::platform_default();
        if let Some(dirs) = &self.access.probe_dirs {
            probe.dirs = dirs.clone();
        }
        if let Some(files) = &self.access.probe_files {
            probe.files = files.clone();
        }
        probe
    }
}
