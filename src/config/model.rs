// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::timeout_from_secs;

/// Configuration exactly as read from TOML, before validation.
///
/// ```toml
/// [database]
/// host = "localhost"
/// user = "shop"
/// password = "secret"
/// name = "shop"
///
/// [paths]
/// project_root = "/srv/shop"
///
/// [process]
/// timeout_secs = 3600
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// Connection parameters; required only for database steps.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub process: ProcessSection,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub database: Option<DatabaseConfig>,
    pub paths: PathsSection,
    pub process: ProcessSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        database: Option<DatabaseConfig>,
        paths: PathsSection,
        process: ProcessSection,
    ) -> Self {
        Self {
            database,
            paths,
            process,
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub port: Option<u16>,

    pub user: String,

    /// Omitted entirely from the command line when absent.
    #[serde(default)]
    pub password: Option<String>,

    /// Database name.
    pub name: String,
}

fn default_host() -> String {
    "localhost".to_string()
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Base directory that relative `--change-dir` / `--change-to-dir`
    /// values are resolved against.
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
        }
    }
}

/// `[process]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessSection {
    /// Per-command timeout in seconds; `0` means unbounded.
    #[serde(default)]
    pub timeout_secs: u64,
}

impl ProcessSection {
    pub fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.timeout_secs)
    }
}
