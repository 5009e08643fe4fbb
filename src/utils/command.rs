use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::models::{CommandOutput, ProcessInvocation, RunConfig};
use crate::utils::{askpass, sudo_session, AppError, AppResult};

/// Performs process invocations on behalf of the installer and the
/// uninstall orchestrator.
///
/// Implementations return `Err` when the process exits unsuccessfully.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &ProcessInvocation) -> AppResult<CommandOutput>;
}

/// Runs invocations on the host, elevating through sudo when asked.
pub struct SystemCommandRunner {
    sudo_path: PathBuf,
    askpass: Option<PathBuf>,
    timeout: Duration,
}

impl SystemCommandRunner {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            sudo_path: config.sudo_path.clone(),
            askpass: config.askpass_path.as_deref().and_then(askpass::prepare_askpass),
            timeout: Duration::from_secs(config.command_timeout_secs),
        }
    }

    /// Ask for the sudo password once, up front.
    pub async fn pre_authenticate(&self) -> bool {
        sudo_session::pre_authenticate(&self.sudo_path, self.askpass.as_deref()).await
    }

    fn build(&self, invocation: &ProcessInvocation) -> Command {
        let mut cmd = if invocation.policy.elevate {
            sudo_session::elevated_command(
                &self.sudo_path,
                self.askpass.as_deref(),
                &invocation.program,
                &invocation.args,
            )
        } else {
            let mut cmd = Command::new(&invocation.program);
            cmd.args(&invocation.args);
            cmd
        };

        cmd.current_dir("/tmp")
            .stdin(if invocation.input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// How long a timed-out child gets to exit after SIGTERM before it is killed.
const TERM_GRACE: Duration = Duration::from_secs(5);

/// Write `input` to the child's stdin from a separate task so a chatty child
/// cannot fill its stdout pipe while we are still blocked on stdin.
fn feed_input(child: &mut Child, input: Option<String>) {
    if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
        tokio::spawn(async move {
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                log::debug!("Failed to write process input: {}", e);
            }
        });
    }
}

fn read_pipe<R>(pipe: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(e) = pipe.read_to_end(&mut buf).await {
                log::debug!("Failed to read process output: {}", e);
            }
        }
        buf
    })
}

/// Stop a timed-out child.
///
/// SIGTERM goes first because sudo relays it to the command it started,
/// while SIGKILL would only take down sudo itself. Whatever is still
/// running after the grace period is killed.
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            // SAFETY: `pid` is our own child and has not been reaped yet.
            unsafe {
                libc::kill(pid as libc::pid_t, libc::SIGTERM);
            }
            if timeout(TERM_GRACE, child.wait()).await.is_ok() {
                return;
            }
        }
    }

    if let Err(e) = child.start_kill() {
        log::debug!("Failed to kill timed-out process: {}", e);
    }
    if let Err(e) = child.wait().await {
        log::debug!("Failed to reap timed-out process: {}", e);
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, invocation: &ProcessInvocation) -> AppResult<CommandOutput> {
        let command_line = invocation.command_line();
        log::debug!("Running {}", command_line);

        let mut child = self
            .build(invocation)
            .spawn()
            .map_err(|e| AppError::CommandFailed(format!("{}: {}", command_line, e)))?;
        feed_input(&mut child, invocation.input.clone());
        let stdout = read_pipe(child.stdout.take());
        let stderr = read_pipe(child.stderr.take());

        let status = match timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => return Err(AppError::CommandFailed(format!("{}: {}", command_line, e))),
            Err(_) => {
                log::warn!("{} timed out, stopping it", command_line);
                terminate(&mut child).await;
                return Err(AppError::Timeout {
                    command: command_line,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&stdout.await.unwrap_or_default()).to_string();
        let stderr = String::from_utf8_lossy(&stderr.await.unwrap_or_default()).to_string();

        if invocation.policy.capture_output {
            for line in stdout.lines().chain(stderr.lines()) {
                log::info!("{}", line);
            }
        }

        if !status.success() {
            return Err(AppError::CommandFailed(format!(
                "{} ({}): {}",
                command_line,
                status,
                stderr.trim()
            )));
        }

        Ok(CommandOutput {
            stdout,
            stderr,
            exit_code: status.code(),
        })
    }
}

/// Logs every invocation instead of running it.
///
/// Probes come back empty, so conditional steps (quit, kext) are skipped.
pub struct DryRunRunner;

#[async_trait]
impl CommandRunner for DryRunRunner {
    async fn run(&self, invocation: &ProcessInvocation) -> AppResult<CommandOutput> {
        log::info!("[dry-run] {}", invocation.command_line());
        Ok(CommandOutput::from_stdout(""))
    }
}
