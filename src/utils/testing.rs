use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::models::{CommandOutput, Notice, NoticeLevel, ProcessInvocation};
use crate::utils::command::CommandRunner;
use crate::utils::progress::Reporter;
use crate::utils::{AppError, AppResult};

enum Reply {
    Stdout(String),
    Fail(String),
}

struct Rule {
    program: String,
    needle: String,
    reply: Reply,
}

/// Records every invocation and answers from canned replies.
///
/// A rule matches when the program is equal and any argument contains the
/// needle. Unmatched invocations succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: Mutex<Vec<ProcessInvocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, program: &str, needle: &str, stdout: &str) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            needle: needle.to_string(),
            reply: Reply::Stdout(stdout.to_string()),
        });
        self
    }

    pub fn fail(mut self, program: &str, needle: &str, message: &str) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            needle: needle.to_string(),
            reply: Reply::Fail(message.to_string()),
        });
        self
    }

    pub fn calls(&self) -> Vec<ProcessInvocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.program.to_string_lossy().to_string())
            .collect()
    }

    pub fn calls_to(&self, program: &str) -> Vec<ProcessInvocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == Path::new(program))
            .collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &ProcessInvocation) -> AppResult<CommandOutput> {
        self.calls.lock().unwrap().push(invocation.clone());

        let rule = self.rules.iter().find(|r| {
            invocation.program == Path::new(&r.program)
                && (r.needle.is_empty() || invocation.args.iter().any(|a| a.contains(&r.needle)))
        });

        match rule.map(|r| &r.reply) {
            Some(Reply::Stdout(stdout)) => Ok(CommandOutput::from_stdout(stdout.clone())),
            Some(Reply::Fail(message)) => Err(AppError::CommandFailed(message.clone())),
            None => Ok(CommandOutput::from_stdout("")),
        }
    }
}

/// Reporter that keeps every notice for later inspection.
pub fn collecting_reporter() -> (Reporter, Arc<Mutex<Vec<Notice>>>) {
    let notices = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notices);
    let reporter = Reporter::new(move |notice: &Notice| sink.lock().unwrap().push(notice.clone()));
    (reporter, notices)
}

pub fn warnings(notices: &Arc<Mutex<Vec<Notice>>>) -> Vec<String> {
    notices
        .lock()
        .unwrap()
        .iter()
        .filter(|n| n.level == NoticeLevel::Warning)
        .map(|n| n.message.clone())
        .collect()
}
