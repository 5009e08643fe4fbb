use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::utils::sudo_session::build_shell_command;

/// How a single process invocation is run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPolicy {
    /// Run through sudo.
    pub elevate: bool,
    /// Surface the process output to the operator.
    pub capture_output: bool,
}

impl ExecutionPolicy {
    pub const ELEVATED: Self = Self {
        elevate: true,
        capture_output: false,
    };

    pub const ELEVATED_CAPTURED: Self = Self {
        elevate: true,
        capture_output: true,
    };
}

/// Sanitized options for running an arbitrary uninstall script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRunOptions {
    pub args: Vec<String>,
    pub input: Option<String>,
    pub policy: ExecutionPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub input: Option<String>,
    pub policy: ExecutionPolicy,
}

impl ProcessInvocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            input: None,
            policy: ExecutionPolicy::default(),
        }
    }

    pub fn from_options(program: impl Into<PathBuf>, options: ScriptRunOptions) -> Self {
        Self {
            program: program.into(),
            args: options.args,
            input: options.input,
            policy: options.policy,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn policy(mut self, policy: ExecutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shell-escaped rendering used in logs and error messages.
    pub fn command_line(&self) -> String {
        let program = self.program.to_string_lossy();
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let rendered = build_shell_command(&program, &args);
        if self.policy.elevate {
            format!("sudo {}", rendered)
        } else {
            rendered
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }
}
