use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sysbackup::errors::BackupError;
use sysbackup::exec::{CommandRunner, CommandSpec, ExecutionResult, RunFuture};

/// What the fake should pretend happened for one command.
#[derive(Debug, Clone)]
pub enum Scripted {
    Succeed { stdout: String },
    Fail { exit_code: i32, stderr: String },
    TimeOut,
}

impl Scripted {
    pub fn ok() -> Self {
        Scripted::Succeed {
            stdout: String::new(),
        }
    }

    pub fn fail(exit_code: i32, stderr: &str) -> Self {
        Scripted::Fail {
            exit_code,
            stderr: stderr.to_string(),
        }
    }
}

/// One command the fake was asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The command as it would be executed.
    pub raw: String,
    /// The command as it would be logged (secrets masked).
    pub display: String,
    pub timeout: Option<Duration>,
}

/// A runner that:
/// - records every command it is given
/// - replays scripted outcomes in order, succeeding once the script is empty.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    script: Arc<Mutex<VecDeque<Scripted>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(outcomes: impl IntoIterator<Item = Scripted>) -> Self {
        let runner = Self::new();
        runner.script.lock().unwrap().extend(outcomes);
        runner
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn raw_commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.raw).collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, spec: CommandSpec) -> RunFuture<'_> {
        let call = RecordedCall {
            raw: spec.raw(),
            display: spec.to_string(),
            timeout: spec.timeout(),
        };
        let outcome = self.script.lock().unwrap().pop_front().unwrap_or_else(Scripted::ok);
        self.calls.lock().unwrap().push(call.clone());

        Box::pin(async move {
            match outcome {
                Scripted::Succeed { stdout } => Ok(ExecutionResult {
                    success: true,
                    exit_code: Some(0),
                    stdout,
                    stderr: String::new(),
                }),
                Scripted::Fail { exit_code, stderr } => Err(BackupError::Execution {
                    exit_code: Some(exit_code),
                    stderr,
                }),
                Scripted::TimeOut => Err(BackupError::Timeout {
                    command: call.display,
                    timeout: call.timeout.unwrap_or_default(),
                }),
            }
        })
    }
}
