use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Relative location of a `.pkg` bundle inside the package's destination directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallDirective(PathBuf);

impl InstallDirective {
    pub fn new(relative_path: impl Into<PathBuf>) -> Self {
        Self(relative_path.into())
    }

    pub fn relative_path(&self) -> &Path {
        &self.0
    }

    pub fn resolve(&self, destination: &Path) -> PathBuf {
        destination.join(&self.0)
    }
}

/// The recognized uninstall step kinds, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Script,
    Launchctl,
    Quit,
    Kext,
    Pkgutil,
    Files,
}

impl StepKind {
    pub const ALL: [StepKind; 6] = [
        StepKind::Script,
        StepKind::Launchctl,
        StepKind::Quit,
        StepKind::Kext,
        StepKind::Pkgutil,
        StepKind::Files,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StepKind::Script => "script",
            StepKind::Launchctl => "launchctl",
            StepKind::Quit => "quit",
            StepKind::Kext => "kext",
            StepKind::Pkgutil => "pkgutil",
            StepKind::Files => "files",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A payload that may be written either as a single value or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// Raw `script` payload: the legacy bare executable string or a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptPayload {
    Executable(String),
    Detailed(Map<String, Value>),
}

/// A payload whose shape does not match what its step kind expects.
#[derive(Debug, Error)]
#[error("uninstall :{step} {message}")]
pub struct PayloadError {
    pub step: StepKind,
    pub message: String,
}

impl PayloadError {
    pub fn new(step: StepKind, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
        }
    }
}

/// One uninstall directive as written in the package description.
///
/// Kept loosely typed so that unknown keys survive deserialization and can
/// be reported; [`StepKind`] decides what is actually executed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UninstallDirective(Map<String, Value>);

impl UninstallDirective {
    pub fn get(&self, kind: StepKind) -> Option<&Value> {
        self.0.get(kind.key())
    }

    /// Keys that do not name any [`StepKind`].
    pub fn unknown_keys(&self) -> Vec<String> {
        self.0
            .keys()
            .filter(|key| StepKind::from_key(key).is_none())
            .cloned()
            .collect()
    }

    /// Payload of `kind` read as a single string or a list of strings.
    pub fn string_list(&self, kind: StepKind) -> Result<Option<Vec<String>>, PayloadError> {
        match self.get(kind) {
            None => Ok(None),
            Some(value) => serde_json::from_value::<OneOrMany<String>>(value.clone())
                .map(|items| Some(items.into_vec()))
                .map_err(|_| PayloadError::new(kind, "expects a string or a list of strings")),
        }
    }
}
