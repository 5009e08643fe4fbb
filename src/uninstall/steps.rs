use std::path::PathBuf;

use super::Orchestrator;
use crate::models::{ExecutionPolicy, ProcessInvocation, ScriptRunOptions};
use crate::utils::AppResult;

const LAUNCHCTL: &str = "/bin/launchctl";
const OSASCRIPT: &str = "/usr/bin/osascript";
const KEXTSTAT: &str = "/usr/sbin/kextstat";
const KEXTUNLOAD: &str = "/sbin/kextunload";
const RM: &str = "/bin/rm";

/// Leading integer of an `osascript` count reply. A reply without leading
/// digits counts as zero running processes; an oversized count saturates.
pub fn parse_process_count(stdout: &str) -> u32 {
    let digits: String = stdout
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

/// `kextstat` prints a header line, then one line per matching loaded
/// extension; more than one line means the extension is loaded.
pub fn is_extension_loaded(status_output: &str) -> bool {
    status_output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count()
        > 1
}

/// Quote `s` as an AppleScript string literal.
fn applescript_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

impl Orchestrator<'_> {
    pub(super) async fn run_script(&self, executable: &str, options: &ScriptRunOptions) -> AppResult<()> {
        self.reporter.info(format!("Running uninstall script {}", executable));
        let program = self.package.resolve(executable);
        self.runner
            .run(&ProcessInvocation::from_options(program, options.clone()))
            .await?;
        Ok(())
    }

    pub(super) async fn remove_services(&self, services: &[String]) {
        for service in services {
            self.reporter.info(format!("Removing launchctl service {}", service));
            let inv = ProcessInvocation::new(LAUNCHCTL)
                .args(["remove", service.as_str()])
                .policy(ExecutionPolicy::ELEVATED);
            if let Err(e) = self.runner.run(&inv).await {
                self.reporter
                    .warn(format!("Failed to remove launchctl service {}: {}", service, e));
            }
        }
    }

    pub(super) async fn quit_applications(&self, bundle_ids: &[String]) {
        for id in bundle_ids {
            self.reporter.info(format!("Quitting application ID {}", id));

            let count_script = format!(
                "tell application \"System Events\" to count processes whose bundle identifier is {}",
                applescript_string(id)
            );
            let count = ProcessInvocation::new(OSASCRIPT)
                .args(["-e".to_string(), count_script])
                .policy(ExecutionPolicy::ELEVATED);
            let running = match self.runner.run(&count).await {
                Ok(output) => parse_process_count(&output.stdout),
                Err(e) => {
                    self.reporter
                        .warn(format!("Could not check whether {} is running: {}", id, e));
                    continue;
                }
            };
            if running == 0 {
                continue;
            }

            let quit = ProcessInvocation::new(OSASCRIPT)
                .args([
                    "-e".to_string(),
                    format!("tell application id {} to quit", applescript_string(id)),
                ])
                .policy(ExecutionPolicy::ELEVATED);
            if let Err(e) = self.runner.run(&quit).await {
                self.reporter.warn(format!("Failed to quit {}: {}", id, e));
            }
        }
    }

    pub(super) async fn unload_kernel_extensions(&self, bundle_ids: &[String]) {
        for id in bundle_ids {
            self.reporter.info(format!("Unloading kernel extension {}", id));

            let status = ProcessInvocation::new(KEXTSTAT)
                .args(["-l", "-b", id.as_str()])
                .policy(ExecutionPolicy::ELEVATED);
            let loaded = match self.runner.run(&status).await {
                Ok(output) => is_extension_loaded(&output.stdout),
                Err(e) => {
                    self.reporter
                        .warn(format!("Could not read status of kernel extension {}: {}", id, e));
                    continue;
                }
            };
            if !loaded {
                continue;
            }

            let unload = ProcessInvocation::new(KEXTUNLOAD)
                .args(["-b", id.as_str()])
                .policy(ExecutionPolicy::ELEVATED);
            if let Err(e) = self.runner.run(&unload).await {
                self.reporter
                    .warn(format!("Failed to unload kernel extension {}: {}", id, e));
            }
        }
    }

    pub(super) async fn remove_receipts(&self, pattern: &str) {
        self.reporter.info("Removing files from pkgutil Bill-of-Materials");

        let receipts = match self.registry.all_matching(pattern, self.runner).await {
            Ok(receipts) => receipts,
            Err(e) => {
                self.reporter
                    .warn(format!("Could not list package receipts matching {}: {}", pattern, e));
                return;
            }
        };
        if receipts.is_empty() {
            log::info!("No package receipts match {}", pattern);
        }

        for receipt in &receipts {
            log::debug!("Uninstalling receipt {}", receipt.package_id);
            if let Err(e) = receipt.uninstall(self.runner).await {
                self.reporter
                    .warn(format!("Failed to uninstall package {}: {}", receipt.package_id, e));
            }
        }
    }

    pub(super) async fn remove_files(&self, paths: &[PathBuf]) {
        for path in paths {
            self.reporter.info(format!("Removing file {}", path.display()));
            let inv = ProcessInvocation::new(RM)
                .args(["-rf".to_string(), "--".to_string(), path.to_string_lossy().to_string()])
                .policy(ExecutionPolicy::ELEVATED);
            if let Err(e) = self.runner.run(&inv).await {
                self.reporter
                    .warn(format!("Failed to remove {}: {}", path.display(), e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_count_reads_leading_integer() {
        assert_eq!(parse_process_count("2\n"), 2);
        assert_eq!(parse_process_count("  0\n"), 0);
        assert_eq!(parse_process_count("3 processes"), 3);
    }

    #[test]
    fn unparsable_process_count_is_zero() {
        assert_eq!(parse_process_count(""), 0);
        assert_eq!(parse_process_count("execution error: not allowed"), 0);
    }

    #[test]
    fn oversized_process_count_still_counts_as_running() {
        assert_eq!(parse_process_count("99999999999999999999\n"), u32::MAX);
    }

    #[test]
    fn header_only_listing_is_not_loaded() {
        let header = "Index Refs Address            Size       Wired      Name (Version) UUID <Linked Against>\n";
        assert!(!is_extension_loaded(header));
        assert!(!is_extension_loaded(""));
        assert!(!is_extension_loaded(&format!("{header}\n\n")));
    }

    #[test]
    fn header_plus_entry_is_loaded() {
        let listing = "Index Refs Address Size Wired Name (Version)\n  \
                       150    0 0xffffff7f80e0e000 0x5000 0x5000 com.example.driver (1.2.0)\n";
        assert!(is_extension_loaded(listing));
    }

    #[test]
    fn applescript_strings_are_escaped() {
        assert_eq!(applescript_string("com.example.app"), "\"com.example.app\"");
        assert_eq!(applescript_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }
}
