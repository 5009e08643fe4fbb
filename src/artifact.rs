use std::sync::Arc;

use crate::installer::Installer;
use crate::models::{InstallDirective, PackageContext, RunConfig, UninstallDirective};
use crate::receipts::{PkgutilRegistry, ReceiptRegistry};
use crate::uninstall::Orchestrator;
use crate::utils::command::CommandRunner;
use crate::utils::progress::Reporter;
use crate::utils::AppResult;

/// Installs and removes the `.pkg` part of a package.
pub struct PkgArtifact {
    package: PackageContext,
    runner: Arc<dyn CommandRunner>,
    registry: Arc<dyn ReceiptRegistry>,
    config: RunConfig,
    reporter: Reporter,
}

impl PkgArtifact {
    pub fn new(package: PackageContext, runner: Arc<dyn CommandRunner>, config: RunConfig) -> Self {
        Self {
            package,
            runner,
            registry: Arc::new(PkgutilRegistry),
            config,
            reporter: Reporter::default(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<dyn ReceiptRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn package(&self) -> &PackageContext {
        &self.package
    }

    pub async fn install(&self, directives: &[InstallDirective]) -> AppResult<()> {
        Installer::new(&self.package, self.runner.as_ref(), &self.reporter, self.config.verbose)
            .install(directives)
            .await
    }

    /// Run every uninstall directive in order; a fatal error in one stops
    /// the rest.
    pub async fn uninstall(&self, directives: &[UninstallDirective]) -> AppResult<()> {
        let orchestrator = Orchestrator::new(
            &self.package,
            self.runner.as_ref(),
            self.registry.as_ref(),
            &self.reporter,
        );
        for directive in directives {
            orchestrator.uninstall(directive).await?;
        }
        Ok(())
    }
}
