// src/plan.rs

//! Step sequencing shared by the backup and restore orchestrators.
//!
//! An invocation moves through `Idle → Database → Assets → Done`. Each
//! stage is optional, but they are only ever entered in that order and a
//! stage is only entered after everything before it succeeded; the first
//! error aborts the invocation (nothing is rolled back).

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::exec::{CommandRunner, ExecutionResult};
use crate::fs::FileSystem;

/// What a step needs from the outside world.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub runner: &'a dyn CommandRunner,
    /// Applied to every command of the invocation.
    pub timeout: Option<Duration>,
}

impl<'a> StepContext<'a> {
    pub fn new(fs: &'a dyn FileSystem, runner: &'a dyn CommandRunner) -> Self {
        Self {
            fs,
            runner,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    Database,
    Assets,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    DatabaseDump,
    AssetArchive,
    DropAndCreate,
    DatabaseLoad,
    AssetExtract,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepKind::DatabaseDump => "database-dump",
            StepKind::AssetArchive => "asset-archive",
            StepKind::DropAndCreate => "drop-and-create",
            StepKind::DatabaseLoad => "database-load",
            StepKind::AssetExtract => "asset-extract",
        };
        f.write_str(s)
    }
}

/// A step that completed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: StepKind,
    /// The backup file written (backup) or read (restore).
    pub file: PathBuf,
    pub stdout: String,
}

impl StepReport {
    pub fn new(step: StepKind, file: PathBuf, result: ExecutionResult) -> Self {
        Self {
            step,
            file,
            stdout: result.stdout,
        }
    }
}

/// One-line summary printed by the CLI after each step.
impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file.display();
        match self.step {
            StepKind::DatabaseDump => write!(f, "sql backup created at {file}"),
            StepKind::AssetArchive => write!(f, "assets backup created at {file}"),
            StepKind::DropAndCreate => write!(f, "database dropped and recreated"),
            StepKind::DatabaseLoad => write!(f, "sql backup restored from {file}"),
            StepKind::AssetExtract => write!(f, "assets backup restored from {file}"),
        }
    }
}

/// Tracks the current stage and the completed steps of one invocation.
#[derive(Debug)]
pub struct Sequence {
    stage: Stage,
    reports: Vec<StepReport>,
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            stage: Stage::Idle,
            reports: Vec::new(),
        }
    }

    /// Move forward to `stage`. Stages never go backwards.
    pub fn enter(&mut self, stage: Stage) {
        debug_assert!(stage > self.stage, "stage {stage:?} entered after {:?}", self.stage);
        debug!(from = ?self.stage, to = ?stage, "entering stage");
        self.stage = stage;
    }

    pub fn record(&mut self, report: StepReport) {
        info!(step = %report.step, file = %report.file.display(), "step succeeded");
        self.reports.push(report);
    }

    pub fn finish(mut self) -> Vec<StepReport> {
        self.enter(Stage::Done);
        self.reports
    }
}
