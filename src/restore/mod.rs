// src/restore/mod.rs

//! Restore orchestrator.
//!
//! Mirrors [`crate::backup`]: the database is restored first (optionally
//! after dropping and recreating it), then the asset archive is extracted.

pub mod assets;
pub mod database;

use std::path::PathBuf;

use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{BackupError, Result};
use crate::plan::{Sequence, Stage, StepContext, StepReport};

pub use assets::AssetRestoreTarget;
pub use database::DatabaseRestoreTarget;

/// Everything one restore invocation needs.
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    /// Directory holding the backup files.
    pub backup_dir: PathBuf,
    /// Base for resolving a relative extraction directory.
    pub project_root: PathBuf,
    pub database: DatabaseRestoreTarget,
    pub assets: AssetRestoreTarget,
}

impl RestoreRequest {
    /// A request with both targets disabled and default filenames.
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            project_root: PathBuf::from("."),
            database: DatabaseRestoreTarget::default(),
            assets: AssetRestoreTarget::default(),
        }
    }
}

/// Run a restore.
///
/// A failed drop-and-create aborts before the load; a failed load does not
/// undo a completed drop-and-create.
pub async fn run_restore(
    ctx: &StepContext<'_>,
    request: &RestoreRequest,
    db: Option<&DatabaseConfig>,
) -> Result<Vec<StepReport>> {
    let mut seq = Sequence::new();

    if request.database.enabled {
        seq.enter(Stage::Database);
        let db = db.ok_or_else(|| {
            BackupError::ConfigError(
                "a database restore was requested but no [database] section is configured"
                    .to_string(),
            )
        })?;
        for report in database::restore(ctx, request, db).await? {
            seq.record(report);
        }
    }

    if request.assets.enabled {
        seq.enter(Stage::Assets);
        seq.record(assets::extract(ctx, request).await?);
    }

    let reports = seq.finish();
    info!(steps = reports.len(), "restore finished");
    Ok(reports)
}
