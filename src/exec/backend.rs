// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The orchestrators talk to a `CommandRunner` instead of spawning processes
//! themselves. This makes it easy to swap in a fake runner in tests while
//! keeping the production implementation in [`supervisor`](super::supervisor).
//!
//! - `ProcessSupervisor` is the real implementation.
//! - `DryRunRunner` prints each command and pretends it succeeded
//!   (`--dry-run`).
//! - Tests provide their own runner that records commands and replays
//!   scripted results.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::exec::command::CommandSpec;
use crate::exec::supervisor::{ExecutionResult, ProcessSupervisor};

pub type RunFuture<'a> = Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>>;

/// Trait abstracting how a built command gets executed.
///
/// The spec is taken by value: once handed over it cannot be run again.
pub trait CommandRunner: Send + Sync {
    fn run(&self, spec: CommandSpec) -> RunFuture<'_>;

    /// `false` for runners that only pretend to execute. Orchestrators skip
    /// filesystem side effects and output checks in that case.
    fn spawns_processes(&self) -> bool {
        true
    }
}

impl CommandRunner for ProcessSupervisor {
    fn run(&self, spec: CommandSpec) -> RunFuture<'_> {
        Box::pin(self.execute(spec))
    }
}

/// Prints every command it is given and reports success without running it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, spec: CommandSpec) -> RunFuture<'_> {
        Box::pin(async move {
            println!("{spec}");
            Ok(ExecutionResult::empty_success())
        })
    }

    fn spawns_processes(&self) -> bool {
        false
    }
}
