pub mod pkgutil;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::models::{ExecutionPolicy, ProcessInvocation};
use crate::utils::command::CommandRunner;
use crate::utils::plist_parser::{get_string, parse_dictionary};
use crate::utils::AppResult;

pub use pkgutil::PkgutilRegistry;

pub(crate) const PKGUTIL: &str = "/usr/sbin/pkgutil";

/// Maximum number of paths handed to a single `rm` invocation.
const REMOVE_BATCH_SIZE: usize = 500;

/// Looks up installed-package receipts.
#[async_trait]
pub trait ReceiptRegistry: Send + Sync {
    /// Reject a matcher the registry could never evaluate.
    fn validate(&self, _pattern: &str) -> AppResult<()> {
        Ok(())
    }

    async fn all_matching(&self, pattern: &str, runner: &dyn CommandRunner) -> AppResult<Vec<Receipt>>;
}

/// A package receipt recorded by the installer, identified by package id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub package_id: String,
}

impl Receipt {
    pub fn new(package_id: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
        }
    }

    /// Remove every file and empty directory the receipt recorded, then
    /// forget the receipt itself.
    pub async fn uninstall(&self, runner: &dyn CommandRunner) -> AppResult<()> {
        let root = self.root(runner).await?;

        let files = self.listing(runner, "--only-files", &root).await?;
        for batch in files.chunks(REMOVE_BATCH_SIZE) {
            let inv = ProcessInvocation::new("/bin/rm")
                .args(["-f", "--"])
                .args(batch.iter().map(|p| p.to_string_lossy().to_string()))
                .policy(ExecutionPolicy::ELEVATED);
            runner.run(&inv).await?;
        }

        let mut dirs = self.listing(runner, "--only-dirs", &root).await?;
        dirs.sort();
        dirs.reverse();
        for dir in dirs.iter().filter(|d| is_empty_dir(d)) {
            let inv = ProcessInvocation::new("/bin/rmdir")
                .args(["--".to_string(), dir.to_string_lossy().to_string()])
                .policy(ExecutionPolicy::ELEVATED);
            runner.run(&inv).await?;
        }

        self.forget(runner).await
    }

    /// Directory the receipt's paths are relative to.
    pub async fn root(&self, runner: &dyn CommandRunner) -> AppResult<PathBuf> {
        let inv = ProcessInvocation::new(PKGUTIL).args(["--pkg-info-plist", self.package_id.as_str()]);
        let output = runner.run(&inv).await?;
        let info = parse_dictionary(&output.stdout)?;

        let volume = get_string(&info, "volume").unwrap_or_else(|| "/".to_string());
        let location = get_string(&info, "install-location").unwrap_or_default();
        Ok(Path::new(&volume).join(location.trim_start_matches('/')))
    }

    pub async fn forget(&self, runner: &dyn CommandRunner) -> AppResult<()> {
        let inv = ProcessInvocation::new(PKGUTIL)
            .args(["--forget", self.package_id.as_str()])
            .policy(ExecutionPolicy::ELEVATED);
        runner.run(&inv).await?;
        Ok(())
    }

    async fn listing(&self, runner: &dyn CommandRunner, filter: &str, root: &Path) -> AppResult<Vec<PathBuf>> {
        let inv = ProcessInvocation::new(PKGUTIL).args([filter, "--files", self.package_id.as_str()]);
        let output = runner.run(&inv).await?;
        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| root.join(line))
            .collect())
    }
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
