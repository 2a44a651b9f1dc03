// src/lib.rs

pub mod backup;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod plan;
pub mod preflight;
pub mod restore;
pub mod tools;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::backup::{run_backup, AssetArchiveTarget, BackupRequest, DatabaseDumpTarget};
use crate::cli::{BackupArgs, CliArgs, CliCommand, RestoreArgs};
use crate::config::{load_or_default, ConfigFile};
use crate::exec::{timeout_from_secs, CommandRunner, DryRunRunner, ProcessSupervisor};
use crate::fs::RealFileSystem;
use crate::plan::{StepContext, StepReport};
use crate::restore::{run_restore, AssetRestoreTarget, DatabaseRestoreTarget, RestoreRequest};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the runner (real supervisor, or the printer for `--dry-run`)
/// - the backup or restore orchestrator
/// - the per-step summary lines on stdout
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(&args.config)
        .with_context(|| format!("loading config from {:?}", args.config))?;
    debug!(paths = ?cfg.paths, process = ?cfg.process, has_database = cfg.database.is_some(), "config loaded");

    let fs = RealFileSystem;
    let supervisor = ProcessSupervisor::new();
    let dry_run = DryRunRunner;
    let runner: &dyn CommandRunner = if args.dry_run { &dry_run } else { &supervisor };

    let reports = match &args.command {
        CliCommand::Backup(b) => {
            let request = backup_request(b, &cfg)?;
            if !request.database.enabled && !request.assets.enabled {
                warn!("nothing to do: pass --backup-sql and/or --backup-assets");
            }
            let ctx = StepContext::new(&fs, runner).with_timeout(effective_timeout(b.timeout, &cfg));
            run_backup(&ctx, &request, cfg.database.as_ref()).await?
        }
        CliCommand::Restore(r) => {
            let request = restore_request(r, &cfg)?;
            if !request.database.enabled && !request.assets.enabled {
                warn!("nothing to do: pass --restore-sql and/or --restore-assets");
            }
            let ctx = StepContext::new(&fs, runner).with_timeout(effective_timeout(r.timeout, &cfg));
            run_restore(&ctx, &request, cfg.database.as_ref()).await?
        }
    };

    if !args.dry_run {
        print_summary(&reports);
    }
    Ok(())
}

/// The CLI value wins over `[process].timeout_secs`; zero disables.
fn effective_timeout(cli_secs: Option<u64>, cfg: &ConfigFile) -> Option<Duration> {
    match cli_secs {
        Some(secs) => timeout_from_secs(secs),
        None => cfg.process.timeout(),
    }
}

fn backup_request(args: &BackupArgs, cfg: &ConfigFile) -> Result<BackupRequest> {
    Ok(BackupRequest {
        target_dir: absolute(&args.target_directory)?,
        project_root: absolute(&cfg.paths.project_root)?,
        database: DatabaseDumpTarget {
            enabled: args.backup_sql,
            filename: args.sql_filename.clone(),
            ignore_tables: args.ignore_tables.clone(),
            add_drop_database: args.add_drop_database,
        },
        assets: AssetArchiveTarget {
            enabled: args.backup_assets,
            filename: args.assets_filename.clone(),
            sources: args.asset_sources.clone(),
            dereference: args.dereference,
            change_dir: args.change_dir.clone(),
        },
    })
}

fn restore_request(args: &RestoreArgs, cfg: &ConfigFile) -> Result<RestoreRequest> {
    Ok(RestoreRequest {
        backup_dir: absolute(&args.backup_directory)?,
        project_root: absolute(&cfg.paths.project_root)?,
        database: DatabaseRestoreTarget {
            enabled: args.restore_sql,
            filename: args.restore_sql_filename.clone(),
            drop_and_create: args.restore_sql_drop_and_create,
        },
        assets: AssetRestoreTarget {
            enabled: args.restore_assets,
            filename: args.restore_assets_filename.clone(),
            unlink_before: args.restore_unlink_before,
            change_to_dir: args.change_to_dir.clone(),
        },
    })
}

/// Anchor a path at the working directory so it survives tar's
/// `--directory` switch.
fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("resolving path {:?}", path))
}

fn print_summary(reports: &[StepReport]) {
    for report in reports {
        println!("{report}");
    }
}
