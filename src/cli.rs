// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Long flags are kebab-case; the camelCase spellings of the original
//! console commands (`--backupSQL`, `--restoreUnlinkBefore`, ...) are
//! accepted as aliases so existing deployment scripts keep working.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `sysbackup`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sysbackup",
    version,
    about = "Back up and restore a MySQL database and asset files.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Sysbackup.toml` in the current working directory. A missing
    /// file is fine for asset-only runs.
    #[arg(long, global = true, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SYSBACKUP_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Check preconditions and print the commands, but don't run them.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Create SQL/archive files as backup.
    #[command(alias = "createbackup")]
    Backup(BackupArgs),

    /// Restore SQL/archive backup files to the database and asset folders.
    #[command(alias = "restorebackup")]
    Restore(RestoreArgs),
}

#[derive(Debug, Clone, Args)]
pub struct BackupArgs {
    /// The directory where the backup files are placed. Must exist.
    #[arg(value_name = "TARGET_DIRECTORY")]
    pub target_directory: PathBuf,

    /// Create the SQL backup.
    #[arg(long, alias = "backupSQL")]
    pub backup_sql: bool,

    /// Create the assets backup.
    #[arg(long, alias = "backupAssets")]
    pub backup_assets: bool,

    /// Comma-separated tables to leave out of the SQL dump.
    #[arg(long, alias = "ignoreTables", value_delimiter = ',', value_name = "TABLES")]
    pub ignore_tables: Vec<String>,

    /// Include DROP/CREATE DATABASE statements in the dump.
    #[arg(long, alias = "addDropDatabase")]
    pub add_drop_database: bool,

    /// SQL backup filename.
    #[arg(long, alias = "sqlFilename", default_value = crate::backup::DEFAULT_SQL_FILENAME)]
    pub sql_filename: String,

    /// Assets backup filename.
    #[arg(long, alias = "assetsFilename", default_value = crate::backup::DEFAULT_ASSETS_FILENAME)]
    pub assets_filename: String,

    /// Path to include in the assets archive (repeatable). Default: `.`
    #[arg(long = "asset-source", alias = "assetSource", value_name = "PATH")]
    pub asset_sources: Vec<PathBuf>,

    /// Archive the files symlinks point to.
    #[arg(long)]
    pub dereference: bool,

    /// Archive from this directory (relative to `[paths].project_root`).
    #[arg(long, alias = "changeDir", value_name = "DIR")]
    pub change_dir: Option<PathBuf>,

    /// Per-command timeout in seconds (0 = none). Overrides the config.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct RestoreArgs {
    /// The directory of the backup files.
    #[arg(value_name = "BACKUP_DIRECTORY")]
    pub backup_directory: PathBuf,

    /// Restore the SQL backup file to the database.
    #[arg(long, alias = "restoreSQL")]
    pub restore_sql: bool,

    /// Drop and create the database before the restore is performed.
    #[arg(long, alias = "restoreSQLDropAndCreate")]
    pub restore_sql_drop_and_create: bool,

    /// SQL backup filename.
    #[arg(long, alias = "restoreSQLFilename", default_value = crate::backup::DEFAULT_SQL_FILENAME)]
    pub restore_sql_filename: String,

    /// Restore the assets backup file.
    #[arg(long, alias = "restoreAssets")]
    pub restore_assets: bool,

    /// Have tar unlink existing resources first.
    #[arg(long, alias = "restoreUnlinkBefore")]
    pub restore_unlink_before: bool,

    /// Restore into this directory (relative to `[paths].project_root`).
    #[arg(long, alias = "changeToDir", value_name = "DIR")]
    pub change_to_dir: Option<PathBuf>,

    /// Assets backup filename.
    #[arg(long, alias = "restoreAssetsFilename", default_value = crate::backup::DEFAULT_ASSETS_FILENAME)]
    pub restore_assets_filename: String,

    /// Per-command timeout in seconds (0 = none). Overrides the config.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
