use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

const SUDO_PROMPT: &str = "caskpkg needs your password to continue:";

/// Build `sudo -E [-A] -- <program> <args>`.
///
/// When an askpass helper is available, `SUDO_ASKPASS` is injected so sudo
/// can prompt through it instead of requiring a TTY.
pub fn elevated_command(sudo: &Path, askpass: Option<&Path>, program: &Path, args: &[String]) -> Command {
    let mut cmd = Command::new(sudo);
    cmd.arg("-E");
    if let Some(ap) = askpass {
        cmd.env("SUDO_ASKPASS", ap);
        cmd.env("SUDO_PROMPT", SUDO_PROMPT);
        cmd.arg("-A");
    }
    cmd.arg("--").arg(program).args(args);
    cmd
}

/// Pre-authenticate with sudo by running `sudo [-A] -v`.
///
/// Establishes a sudo timestamp so subsequent elevated invocations succeed
/// without prompting again. Returns `true` if authentication succeeded.
pub async fn pre_authenticate(sudo: &Path, askpass: Option<&Path>) -> bool {
    let mut cmd = Command::new(sudo);
    cmd.current_dir("/tmp").stdin(Stdio::inherit());
    if let Some(ap) = askpass {
        cmd.env("SUDO_ASKPASS", ap).env("SUDO_PROMPT", SUDO_PROMPT).arg("-A");
    }
    cmd.arg("-v");

    match cmd.status().await {
        Ok(status) => status.success(),
        Err(e) => {
            log::warn!("Failed to run {}: {}", sudo.display(), e);
            false
        }
    }
}

/// Build a shell-safe command string from a program and its arguments.
pub fn build_shell_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![shell_escape(program)];
    for arg in args {
        parts.push(shell_escape(arg));
    }
    parts.join(" ")
}

/// Escape a string for use inside a shell command.
fn shell_escape(s: &str) -> String {
    if !s.is_empty()
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '/' || c == '.' || c == '-' || c == '_')
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}
