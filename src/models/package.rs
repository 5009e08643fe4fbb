use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{InstallDirective, UninstallDirective};
use crate::utils::AppResult;

/// The package being installed or removed, as seen by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageContext {
    /// Display identifier used in status messages.
    pub token: String,
    /// Base directory for relative `.pkg` and script paths.
    pub destination_path: PathBuf,
}

impl PackageContext {
    pub fn new(token: impl Into<String>, destination_path: impl Into<PathBuf>) -> Self {
        Self {
            token: token.into(),
            destination_path: destination_path.into(),
        }
    }

    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.destination_path.join(relative)
    }
}

/// Resolved package description handed to the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub token: String,
    pub destination_path: PathBuf,
    #[serde(default)]
    pub install: Vec<InstallDirective>,
    #[serde(default)]
    pub uninstall: Vec<UninstallDirective>,
}

impl PackageManifest {
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn context(&self) -> PackageContext {
        PackageContext::new(self.token.clone(), self.destination_path.clone())
    }
}
