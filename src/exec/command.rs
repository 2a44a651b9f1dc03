// src/exec/command.rs

//! Command specifications handed to the supervisor.
//!
//! A [`CommandSpec`] is built once, by value, and consumed by whichever
//! [`CommandRunner`](crate::exec::CommandRunner) executes it. Shell pipelines
//! are assembled with [`ShellCommand`], which escapes every value token and
//! keeps track of secrets that must not show up in logs.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use tokio::process::Command;

use crate::exec::escape::shell_quote;

/// Interpreter for [`CommandLine::Shell`]. Needs `pipefail`, which plain
/// POSIX `sh` does not guarantee.
const SHELL: &str = "bash";

/// Convert a timeout given in whole seconds into the supervisor's form.
///
/// Zero means "no timeout".
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

/// What actually gets launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    /// A complete shell command line, run through `bash -o pipefail -c` so
    /// that a failing stage anywhere in a pipeline fails the whole line.
    Shell(String),
    /// A program and its arguments, launched directly.
    Argv { program: String, args: Vec<String> },
}

/// A fully built external command plus its timeout policy.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    line: CommandLine,
    timeout: Option<Duration>,
    /// `(token, masked)` pairs substituted when rendering for logs.
    redactions: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn shell(line: impl Into<String>) -> Self {
        Self {
            line: CommandLine::Shell(line.into()),
            timeout: None,
            redactions: Vec::new(),
        }
    }

    pub fn argv<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            line: CommandLine::Argv {
                program: program.into(),
                args: args.into_iter().map(Into::into).collect(),
            },
            timeout: None,
            redactions: Vec::new(),
        }
    }

    /// Attach a timeout. `None` and a zero duration both mean unbounded.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    pub fn line(&self) -> &CommandLine {
        &self.line
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The command as it is executed, secrets included.
    pub fn raw(&self) -> String {
        match &self.line {
            CommandLine::Shell(line) => line.clone(),
            CommandLine::Argv { program, args } => std::iter::once(program.as_str())
                .chain(args.iter().map(String::as_str))
                .map(shell_quote)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Build the OS-level command. Stdio wiring is left to the caller.
    pub(crate) fn to_command(&self) -> Command {
        match &self.line {
            CommandLine::Shell(line) => {
                let mut c = Command::new(SHELL);
                c.args(["-o", "pipefail", "-c"]).arg(line);
                c
            }
            CommandLine::Argv { program, args } => {
                let mut c = Command::new(program);
                c.args(args);
                c
            }
        }
    }
}

/// Renders the command for trace output, with secrets masked.
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = self.raw();
        for (token, masked) in &self.redactions {
            rendered = rendered.replace(token.as_str(), masked);
        }
        f.write_str(&rendered)
    }
}

/// Incremental builder for a single shell command line.
///
/// Literal flags (`flag`) are trusted and inserted as-is; they only ever come
/// from this crate. Everything else (`arg`, `path`, `option`) is escaped as a
/// single shell word.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    parts: Vec<String>,
    redactions: Vec<(String, String)>,
}

impl ShellCommand {
    pub fn new(program: &str) -> Self {
        Self {
            parts: vec![program.to_string()],
            redactions: Vec::new(),
        }
    }

    pub fn flag(mut self, flag: &str) -> Self {
        self.parts.push(flag.to_string());
        self
    }

    /// Append `flags` only when `enabled`; contributes nothing otherwise.
    pub fn flags_if(mut self, enabled: bool, flags: &[&str]) -> Self {
        if enabled {
            self.parts.extend(flags.iter().map(|f| f.to_string()));
        }
        self
    }

    pub fn arg(mut self, value: &str) -> Self {
        self.parts.push(shell_quote(value));
        self
    }

    pub fn path(self, path: &Path) -> Self {
        self.arg(&path.to_string_lossy())
    }

    /// `name=<value>` with the value escaped.
    pub fn option(mut self, name: &str, value: &str) -> Self {
        self.parts.push(format!("{name}={}", shell_quote(value)));
        self
    }

    /// Like [`option`](Self::option), but the value is masked in logs.
    pub fn secret_option(mut self, name: &str, value: &str) -> Self {
        let token = format!("{name}={}", shell_quote(value));
        self.redactions.push((token.clone(), format!("{name}=***")));
        self.parts.push(token);
        self
    }

    pub fn stdin_from(mut self, path: &Path) -> Self {
        self.parts.push("<".to_string());
        self.path(path)
    }

    pub fn stdout_to(mut self, path: &Path) -> Self {
        self.parts.push(">".to_string());
        self.path(path)
    }

    /// Pipe this command's stdout into `next`.
    pub fn pipe(mut self, next: ShellCommand) -> Self {
        self.parts.push("|".to_string());
        self.parts.extend(next.parts);
        self.redactions.extend(next.redactions);
        self
    }

    pub fn into_spec(self, timeout: Option<Duration>) -> CommandSpec {
        CommandSpec {
            line: CommandLine::Shell(self.parts.join(" ")),
            timeout: timeout.filter(|t| !t.is_zero()),
            redactions: self.redactions,
        }
    }
}
