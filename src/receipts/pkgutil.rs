use async_trait::async_trait;
use regex::Regex;

use super::{Receipt, ReceiptRegistry, PKGUTIL};
use crate::models::ProcessInvocation;
use crate::utils::command::CommandRunner;
use crate::utils::AppResult;

/// Receipt registry backed by `pkgutil --pkgs`.
pub struct PkgutilRegistry;

impl PkgutilRegistry {
    /// Compile `pattern` so that it has to match a whole package id.
    pub fn matcher(pattern: &str) -> AppResult<Regex> {
        Ok(Regex::new(&format!("^(?:{})$", pattern))?)
    }
}

#[async_trait]
impl ReceiptRegistry for PkgutilRegistry {
    fn validate(&self, pattern: &str) -> AppResult<()> {
        Self::matcher(pattern).map(|_| ())
    }

    async fn all_matching(&self, pattern: &str, runner: &dyn CommandRunner) -> AppResult<Vec<Receipt>> {
        let matcher = Self::matcher(pattern)?;
        let output = runner.run(&ProcessInvocation::new(PKGUTIL).args(["--pkgs"])).await?;

        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|id| !id.is_empty() && matcher.is_match(id))
            .map(Receipt::new)
            .collect())
    }
}
