// src/exec/supervisor.rs

//! The process supervisor: launch one command, watch it, report on it.
//!
//! The child is started without blocking and then polled on a fixed cadence
//! ([`POLL_INTERVAL`]). Each tick checks whether the child has exited and,
//! if a timeout was configured, whether the deadline has passed. A child
//! that overruns is killed and reported as [`BackupError::Timeout`].
//!
//! On unix every child leads its own process group, and a timeout kills the
//! whole group: the interesting work usually happens in the members of a
//! pipeline, not in the shell that started them.
//!
//! Stdout and stderr are drained by background tasks for the whole lifetime
//! of the child so that a chatty tool cannot stall on a full pipe while the
//! supervisor is sleeping between polls. Collecting them after exit is bound
//! by the same deadline, since a leftover group member may still hold the
//! pipes open.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::{BackupError, Result};
use crate::exec::command::CommandSpec;

/// How often a running child is checked for exit and timeout expiry.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Outcome of a command that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    /// A successful result with no output, e.g. for runners that do not
    /// actually spawn anything.
    pub fn empty_success() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            ..Self::default()
        }
    }
}

/// Runs [`CommandSpec`]s as child processes, one at a time.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    poll_interval: Duration,
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
        }
    }
}

type Drain = JoinHandle<std::io::Result<String>>;

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the poll cadence. Production code uses [`POLL_INTERVAL`].
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Execute `spec` to completion.
    ///
    /// Errors:
    /// - [`BackupError::Launch`] if the process cannot be spawned (no polling
    ///   happens in that case),
    /// - [`BackupError::Timeout`] if the deadline passed, either while the
    ///   child ran or while its output was still being collected; the process
    ///   group is killed and partial output dropped,
    /// - [`BackupError::Execution`] on a non-zero exit, carrying the child's
    ///   stderr unmodified.
    pub async fn execute(&self, spec: CommandSpec) -> Result<ExecutionResult> {
        let trace_line = spec.to_string();
        info!(cmd = %trace_line, "running command");

        let mut cmd = spec.to_command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|source| BackupError::Launch {
            command: trace_line.clone(),
            source,
        })?;
        // Leader of its own group, so the pid doubles as the group id.
        let group = child.id();

        let mut stdout = drain(child.stdout.take());
        let mut stderr = drain(child.stderr.take());

        let timeout = spec.timeout();
        let deadline = timeout.map(|t| started + t);

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }

            if let (Some(deadline), Some(timeout)) = (deadline, timeout) {
                if Instant::now() >= deadline {
                    warn!(
                        cmd = %trace_line,
                        timeout = ?timeout,
                        "command exceeded its timeout; killing process group"
                    );
                    kill_group(group);
                    reap(&mut child, &trace_line).await;
                    stdout.abort();
                    stderr.abort();
                    return Err(BackupError::Timeout {
                        command: trace_line,
                        timeout,
                    });
                }
            }

            debug!(cmd = %trace_line, elapsed_ms = started.elapsed().as_millis() as u64, "still running");
            tokio::time::sleep(self.poll_interval).await;
        };

        let outputs = async {
            let out = collect(&mut stdout).await?;
            let err = collect(&mut stderr).await?;
            Ok::<_, BackupError>((out, err))
        };
        let collected = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, outputs).await.ok(),
            None => Some(outputs.await),
        };
        let (stdout, stderr) = match collected {
            Some(outputs) => outputs?,
            None => {
                warn!(
                    cmd = %trace_line,
                    "command exited but its output pipes stayed open past the timeout; killing process group"
                );
                kill_group(group);
                stdout.abort();
                stderr.abort();
                return Err(BackupError::Timeout {
                    command: trace_line,
                    timeout: timeout.unwrap_or_default(),
                });
            }
        };
        let exit_code = status.code();

        info!(
            exit_code = exit_code.unwrap_or(-1),
            success = status.success(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "command exited"
        );

        if !status.success() {
            return Err(BackupError::Execution { exit_code, stderr });
        }

        if !stdout.trim().is_empty() {
            info!("{}", stdout.trim_end());
        }

        Ok(ExecutionResult {
            success: true,
            exit_code,
            stdout,
            stderr,
        })
    }
}

/// SIGKILL every process in the child's group. A group that is already gone
/// is not an error.
#[cfg(unix)]
fn kill_group(group: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pgid) = group.and_then(|id| i32::try_from(id).ok()) else {
        return;
    };
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => warn!(pgid, error = %e, "failed to kill process group"),
    }
}

#[cfg(not(unix))]
fn kill_group(_group: Option<u32>) {}

/// Kill the direct child if it is still around and wait for it.
async fn reap(child: &mut Child, trace_line: &str) {
    if let Err(e) = child.kill().await {
        warn!(cmd = %trace_line, error = %e, "failed to kill timed-out process");
    }
}

fn drain<R>(pipe: Option<R>) -> Drain
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
    })
}

async fn collect(handle: &mut Drain) -> Result<String> {
    let text = handle.await.map_err(anyhow::Error::from)??;
    Ok(text)
}
