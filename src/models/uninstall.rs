use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{ScriptRunOptions, StepKind};

/// A validated uninstall phase, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UninstallStep {
    Script {
        executable: String,
        options: ScriptRunOptions,
    },
    Launchctl {
        services: Vec<String>,
    },
    Quit {
        bundle_ids: Vec<String>,
    },
    Kext {
        bundle_ids: Vec<String>,
    },
    Pkgutil {
        pattern: String,
    },
    Files {
        paths: Vec<PathBuf>,
    },
}

impl UninstallStep {
    pub fn kind(&self) -> StepKind {
        match self {
            UninstallStep::Script { .. } => StepKind::Script,
            UninstallStep::Launchctl { .. } => StepKind::Launchctl,
            UninstallStep::Quit { .. } => StepKind::Quit,
            UninstallStep::Kext { .. } => StepKind::Kext,
            UninstallStep::Pkgutil { .. } => StepKind::Pkgutil,
            UninstallStep::Files { .. } => StepKind::Files,
        }
    }
}
