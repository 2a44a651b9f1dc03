// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for turning backup/restore steps into external
//! processes and supervising them with `tokio::process::Command`.
//!
//! - [`escape`] quotes user-controlled values as single shell words.
//! - [`command`] holds [`CommandSpec`] and the [`ShellCommand`] builder.
//! - [`supervisor`] launches a spec, polls it, enforces its timeout and
//!   collects its output.
//! - [`backend`] provides the `CommandRunner` trait the orchestrators use,
//!   implemented by the supervisor, by the dry-run printer and by test fakes.

pub mod backend;
pub mod command;
pub mod escape;
pub mod supervisor;

pub use backend::{CommandRunner, DryRunRunner, RunFuture};
pub use command::{timeout_from_secs, CommandLine, CommandSpec, ShellCommand};
pub use supervisor::{ExecutionResult, ProcessSupervisor, POLL_INTERVAL};
