//! Install and remove macOS `.pkg` based packages.
//!
//! [`PkgArtifact`] drives the native installer for install directives and the
//! uninstall [`Orchestrator`](uninstall::Orchestrator) for uninstall
//! directives. All process execution goes through a
//! [`CommandRunner`](utils::command::CommandRunner).

pub mod artifact;
pub mod installer;
pub mod models;
pub mod receipts;
pub mod uninstall;
pub mod utils;

pub use artifact::PkgArtifact;
pub use utils::{AppError, AppResult};
