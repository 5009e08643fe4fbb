use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Global run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    pub verbose: bool,
    pub command_timeout_secs: u64,
    pub askpass_path: Option<PathBuf>,
    pub sudo_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            command_timeout_secs: 900,
            askpass_path: None,
            sudo_path: PathBuf::from("/usr/bin/sudo"),
        }
    }
}

impl RunConfig {
    /// `<config_dir>/caskpkg/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("caskpkg").join("settings.json"))
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or cannot be parsed.
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Failed to read settings from {}: {}", path.display(), e);
                }
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
