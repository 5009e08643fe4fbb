pub mod script;
pub mod steps;

use serde_json::Value;

use crate::models::{PackageContext, PayloadError, StepKind, UninstallDirective, UninstallStep};
use crate::receipts::ReceiptRegistry;
use crate::utils::command::CommandRunner;
use crate::utils::progress::Reporter;
use crate::utils::{expand_tilde, AppError, AppResult};

pub use steps::{is_extension_loaded, parse_process_count};

/// Executes one uninstall directive as a fixed-order sequence of phases.
///
/// Every phase payload is validated before the first process runs. A
/// `script` phase failure aborts the directive; the remaining phases are
/// best-effort: a malformed payload skips its phase and a failed item only
/// warns.
pub struct Orchestrator<'a> {
    package: &'a PackageContext,
    runner: &'a dyn CommandRunner,
    registry: &'a dyn ReceiptRegistry,
    reporter: &'a Reporter,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        package: &'a PackageContext,
        runner: &'a dyn CommandRunner,
        registry: &'a dyn ReceiptRegistry,
        reporter: &'a Reporter,
    ) -> Self {
        Self {
            package,
            runner,
            registry,
            reporter,
        }
    }

    pub async fn uninstall(&self, directive: &UninstallDirective) -> AppResult<()> {
        self.reporter.info(format!(
            "Running uninstall process for {}; your password may be necessary",
            self.package.token
        ));

        let unknown_keys = directive.unknown_keys();
        if !unknown_keys.is_empty() {
            self.reporter.warn(format!(
                "Unknown arguments to uninstall: {} (ignored)",
                unknown_keys.join(", ")
            ));
        }

        let steps = self.plan(directive)?;
        for step in &steps {
            self.execute(step).await?;
        }
        Ok(())
    }

    /// Validate and normalize every recognized phase of `directive`.
    ///
    /// A `script` payload without an executable is fatal. Any other
    /// malformed payload is reported and its phase left out of the plan.
    pub fn plan(&self, directive: &UninstallDirective) -> AppResult<Vec<UninstallStep>> {
        let mut steps = Vec::new();

        for kind in StepKind::ALL {
            let Some(raw) = directive.get(kind) else {
                continue;
            };

            let planned = match kind {
                StepKind::Script => {
                    steps.push(self.script_step(raw)?);
                    continue;
                }
                StepKind::Launchctl => self
                    .string_list(directive, kind)
                    .map(|services| UninstallStep::Launchctl { services }),
                StepKind::Quit => self
                    .string_list(directive, kind)
                    .map(|bundle_ids| UninstallStep::Quit { bundle_ids }),
                StepKind::Kext => self
                    .string_list(directive, kind)
                    .map(|bundle_ids| UninstallStep::Kext { bundle_ids }),
                StepKind::Pkgutil => self.pkgutil_pattern(raw).map(|pattern| UninstallStep::Pkgutil { pattern }),
                StepKind::Files => self.string_list(directive, kind).map(|paths| UninstallStep::Files {
                    paths: paths.iter().map(|p| expand_tilde(p)).collect(),
                }),
            };

            match planned {
                Ok(step) => steps.push(step),
                Err(reason) => self
                    .reporter
                    .warn(format!("Skipping uninstall :{} for {}: {}", kind, self.package.token, reason)),
            }
        }

        Ok(steps)
    }

    fn script_step(&self, raw: &Value) -> AppResult<UninstallStep> {
        let kind = StepKind::Script;
        let normalized = script::normalize(raw, kind).map_err(|e| self.invalid(e))?;
        if !normalized.dropped_keys.is_empty() {
            self.reporter.warn(format!(
                "Unknown arguments to uninstall :{} -- :{} (ignored)",
                kind,
                normalized.dropped_keys.join(", :")
            ));
        }
        let executable = normalized.executable.ok_or_else(|| {
            AppError::invalid_directive(&self.package.token, "uninstall :script without :executable")
        })?;
        Ok(UninstallStep::Script {
            executable,
            options: normalized.options,
        })
    }

    fn string_list(&self, directive: &UninstallDirective, kind: StepKind) -> Result<Vec<String>, String> {
        directive
            .string_list(kind)
            .map(Option::unwrap_or_default)
            .map_err(|e| e.message)
    }

    fn pkgutil_pattern(&self, raw: &Value) -> Result<String, String> {
        let pattern = raw
            .as_str()
            .ok_or_else(|| "expects a package id pattern".to_string())?;
        self.registry.validate(pattern).map_err(|e| e.to_string())?;
        Ok(pattern.to_string())
    }

    async fn execute(&self, step: &UninstallStep) -> AppResult<()> {
        match step {
            UninstallStep::Script {
                executable,
                options,
            } => return self.run_script(executable, options).await,
            UninstallStep::Launchctl { services } => self.remove_services(services).await,
            UninstallStep::Quit { bundle_ids } => self.quit_applications(bundle_ids).await,
            UninstallStep::Kext { bundle_ids } => self.unload_kernel_extensions(bundle_ids).await,
            UninstallStep::Pkgutil { pattern } => self.remove_receipts(pattern).await,
            UninstallStep::Files { paths } => self.remove_files(paths).await,
        }
        Ok(())
    }

    fn invalid(&self, err: PayloadError) -> AppError {
        AppError::invalid_directive(&self.package.token, err.to_string())
    }
}
