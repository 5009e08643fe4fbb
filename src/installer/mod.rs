use crate::models::{ExecutionPolicy, InstallDirective, PackageContext, ProcessInvocation};
use crate::utils::command::CommandRunner;
use crate::utils::progress::Reporter;
use crate::utils::{AppError, AppResult};

const INSTALLER: &str = "/usr/sbin/installer";

/// Runs the native installer for each `.pkg` of a package.
pub struct Installer<'a> {
    package: &'a PackageContext,
    runner: &'a dyn CommandRunner,
    reporter: &'a Reporter,
    verbose: bool,
}

impl<'a> Installer<'a> {
    pub fn new(
        package: &'a PackageContext,
        runner: &'a dyn CommandRunner,
        reporter: &'a Reporter,
        verbose: bool,
    ) -> Self {
        Self {
            package,
            runner,
            reporter,
            verbose,
        }
    }

    /// Install every bundle in order, stopping at the first failure.
    pub async fn install(&self, directives: &[InstallDirective]) -> AppResult<()> {
        for directive in directives {
            self.run_installer(directive).await?;
        }
        Ok(())
    }

    pub async fn run_installer(&self, directive: &InstallDirective) -> AppResult<()> {
        self.reporter.info(format!(
            "Running installer for {}; your password may be necessary.",
            self.package.token
        ));

        let pkg = directive.resolve(&self.package.destination_path);
        let mut args = vec![
            "-pkg".to_string(),
            pkg.to_string_lossy().to_string(),
            "-target".to_string(),
            "/".to_string(),
        ];
        if self.verbose {
            args.push("-verboseR".to_string());
        }

        let inv = ProcessInvocation::new(INSTALLER)
            .args(args)
            .policy(ExecutionPolicy::ELEVATED_CAPTURED);
        self.runner
            .run(&inv)
            .await
            .map_err(|e| AppError::InstallFailed {
                package: self.package.token.clone(),
                bundle: directive.relative_path().display().to_string(),
                source: Box::new(e),
            })?;
        Ok(())
    }
}
