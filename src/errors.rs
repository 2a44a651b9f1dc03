// src/errors.rs

//! Crate-wide error type and `Result` alias.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    /// A path the step depends on is missing. Raised before any process is
    /// launched.
    #[error("{0}")]
    Precondition(String),

    /// The external tool could not be started at all.
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The child outlived its allotted time and was killed.
    #[error("process exceeded the timeout of {timeout:?}: {command}")]
    Timeout { command: String, timeout: Duration },

    /// The child exited non-zero. `stderr` is the tool's own diagnostic,
    /// untouched.
    #[error("{stderr}")]
    Execution { exit_code: Option<i32>, stderr: String },

    /// The command exited zero but the file it should have written is absent.
    #[error("command reported success but {} was not produced", .0.display())]
    MissingOutput(std::path::PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BackupError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        BackupError::Precondition(msg.into())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BackupError>;
