//! Command execution with a per-invocation timeout
//!
//! Every external command the workflow issues goes through a
//! [`CommandExecutor`]. The production implementation, [`CommandRunner`],
//! spawns the process, captures both output streams, kills it once its
//! budget is spent and classifies the result.

use crate::constants::runner::{DEFAULT_COMMAND_TIMEOUT_SECS, DRAIN_GRACE_MS};
use crate::errors::{Result, WorkflowError};
use crate::git::Logger;
use crate::utils::{NO_EXIT_CODE, describe_exit};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// A single command to run
///
/// Built once and consumed by [`CommandExecutor::execute`], so an
/// invocation can never be run twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    command: Vec<String>,
    working_dir: Option<PathBuf>,
    timeout_seconds: u64,
    raise_on_failure: bool,
}

impl Invocation {
    /// Create an invocation from program and arguments
    ///
    /// Defaults to the standard timeout and failing on a non-zero exit.
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            working_dir: None,
            timeout_seconds: DEFAULT_COMMAND_TIMEOUT_SECS,
            raise_on_failure: true,
        }
    }

    pub fn in_dir(mut self, dir: Option<&Path>) -> Self {
        self.working_dir = dir.map(Path::to_path_buf);
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_seconds = secs;
        self
    }

    /// Return the result instead of an error when the command fails
    pub fn allow_failure(mut self) -> Self {
        self.raise_on_failure = false;
        self
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    pub fn raise_on_failure(&self) -> bool {
        self.raise_on_failure
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command.join(" "))
    }
}

/// Captured outcome of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub timed_out: bool,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}

/// Seam between the workflow stages and process execution
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the invocation to completion or until its timeout expires
    ///
    /// # Errors
    /// - [`WorkflowError::Spawn`] if the process cannot be started
    /// - [`WorkflowError::CommandFailure`] on a non-zero exit when the
    ///   invocation raises on failure
    /// - [`WorkflowError::Timeout`] when the invocation was killed and
    ///   raises on failure
    /// - [`WorkflowError::Cancelled`] when the run was interrupted while the
    ///   process was still running
    async fn execute(&self, invocation: Invocation) -> Result<ExecutionResult>;
}

#[derive(Debug, Clone)]
pub struct CommandRunner {
    logger: Logger,
    echo_output: bool,
    cancel: CancellationToken,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self {
            logger: Logger::new("run"),
            echo_output: true,
            cancel: CancellationToken::new(),
        }
    }
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the captured stdout/stderr blocks in the log
    pub fn quiet(mut self) -> Self {
        self.echo_output = false;
        self
    }

    /// Kill the running process as soon as `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

#[async_trait]
impl CommandExecutor for CommandRunner {
    async fn execute(&self, invocation: Invocation) -> Result<ExecutionResult> {
        let display = invocation.to_string();
        let Some((program, args)) = invocation.command.split_first() else {
            return Err(WorkflowError::Spawn {
                command: display,
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            });
        };

        self.logger.info(&format!("Running {display} ..."));

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| WorkflowError::Spawn {
            command: display.clone(),
            source,
        })?;

        let stdout_buf = Arc::new(Mutex::new(Vec::new()));
        let stderr_buf = Arc::new(Mutex::new(Vec::new()));
        let mut stdout_task = spawn_drain(child.stdout.take(), Arc::clone(&stdout_buf));
        let mut stderr_task = spawn_drain(child.stderr.take(), Arc::clone(&stderr_buf));

        let budget = Duration::from_secs(invocation.timeout_seconds);
        let waited = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            waited = timeout(budget, child.wait()) => Some(waited),
        };
        let Some(waited) = waited else {
            self.logger
                .warn(&format!("{display} interrupted, killing process"));
            child.kill().await?;
            stdout_task.abort();
            stderr_task.abort();
            return Err(WorkflowError::Cancelled);
        };
        let (status, timed_out) = match waited {
            Ok(status) => (status?, false),
            Err(_) => {
                self.logger.warn(&format!(
                    "{display} timed out after {}s, killing process and collecting output",
                    invocation.timeout_seconds
                ));
                child.kill().await?;
                (child.wait().await?, true)
            }
        };

        // A grandchild can keep the pipes open after the child is gone
        let grace = Duration::from_millis(DRAIN_GRACE_MS);
        let drained = timeout(grace, async {
            let _ = (&mut stdout_task).await;
            let _ = (&mut stderr_task).await;
        })
        .await;
        if drained.is_err() {
            stdout_task.abort();
            stderr_task.abort();
        }

        let result = ExecutionResult {
            stdout: take_text(&stdout_buf),
            stderr: take_text(&stderr_buf),
            exit_code: status.code().unwrap_or(NO_EXIT_CODE),
            timed_out,
        };

        if self.echo_output {
            if !result.stdout.is_empty() {
                self.logger.block("stdout", &result.stdout);
            }
            if !result.stderr.is_empty() {
                self.logger.block("stderr", &result.stderr);
            }
        }

        self.logger.info(&format!(
            "{display} ended with exit code {} ({})",
            result.exit_code,
            describe_exit(result.exit_code, result.timed_out)
        ));

        if invocation.raise_on_failure && !result.success() {
            return Err(if result.timed_out {
                WorkflowError::Timeout {
                    command: display,
                    timeout_secs: invocation.timeout_seconds,
                    stdout: result.stdout,
                    stderr: result.stderr,
                }
            } else {
                WorkflowError::CommandFailure {
                    command: display,
                    exit_code: result.exit_code,
                    stderr: result.stderr,
                }
            });
        }

        Ok(result)
    }
}

/// Copy a pipe into a shared buffer until EOF
///
/// The buffer is shared rather than returned so output read before an
/// aborted drain is still available.
fn spawn_drain<R>(pipe: Option<R>, sink: Arc<Mutex<Vec<u8>>>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut pipe) = pipe else {
            return;
        };
        let mut chunk = [0u8; 4096];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let mut bytes = sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    bytes.extend_from_slice(&chunk[..n]);
                }
            }
        }
    })
}

fn take_text(buf: &Mutex<Vec<u8>>) -> String {
    let bytes = buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    String::from_utf8_lossy(&bytes).into_owned()
}
