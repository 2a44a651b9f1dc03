// src/backup/mod.rs

//! Backup orchestrator.
//!
//! Runs the enabled targets of a [`BackupRequest`] in order: database dump
//! first, then the asset archive. Each target builds exactly one command;
//! a disabled target builds none.

pub mod assets;
pub mod database;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{BackupError, Result};
use crate::plan::{Sequence, Stage, StepContext, StepReport};

pub use assets::AssetArchiveTarget;
pub use database::DatabaseDumpTarget;

pub const DEFAULT_SQL_FILENAME: &str = "database.sql.gz";
pub const DEFAULT_ASSETS_FILENAME: &str = "assets.tar.gz";

/// Everything one backup invocation needs.
#[derive(Debug, Clone)]
pub struct BackupRequest {
    /// Directory the backup files are written into. Must exist.
    pub target_dir: PathBuf,
    /// Base for resolving a relative asset change-directory.
    pub project_root: PathBuf,
    pub database: DatabaseDumpTarget,
    pub assets: AssetArchiveTarget,
}

impl BackupRequest {
    /// A request with both targets disabled and default filenames.
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            project_root: PathBuf::from("."),
            database: DatabaseDumpTarget::default(),
            assets: AssetArchiveTarget::default(),
        }
    }
}

/// Run a backup.
///
/// `db` is only consulted when the database target is enabled; requesting a
/// dump without connection settings is a configuration error raised before
/// anything runs.
pub async fn run_backup(
    ctx: &StepContext<'_>,
    request: &BackupRequest,
    db: Option<&DatabaseConfig>,
) -> Result<Vec<StepReport>> {
    let mut seq = Sequence::new();

    if request.database.enabled {
        seq.enter(Stage::Database);
        let db = db.ok_or_else(|| {
            BackupError::ConfigError(
                "a database backup was requested but no [database] section is configured"
                    .to_string(),
            )
        })?;
        seq.record(database::dump(ctx, request, db).await?);
    }

    if request.assets.enabled {
        seq.enter(Stage::Assets);
        seq.record(assets::archive(ctx, request).await?);
    }

    let reports = seq.finish();
    info!(steps = reports.len(), "backup finished");
    Ok(reports)
}

/// After a backup command reported success, make sure it left its file.
fn verify_output(ctx: &StepContext<'_>, output: &Path) -> Result<()> {
    if ctx.runner.spawns_processes() && !ctx.fs.is_file(output) {
        return Err(BackupError::MissingOutput(output.to_path_buf()));
    }
    Ok(())
}
