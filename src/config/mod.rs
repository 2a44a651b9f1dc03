// src/config/mod.rs

//! Configuration loading and validation for sysbackup.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it into a [`ConfigFile`] (`validate.rs`).
//!
//! The orchestrators never read configuration themselves; the entry point
//! loads it once and passes the relevant pieces down explicitly.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, DatabaseConfig, PathsSection, ProcessSection, RawConfigFile};
