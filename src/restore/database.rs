// src/restore/database.rs

//! Optional `DROP`/`CREATE`, then `gunzip < database.sql.gz | mysql`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backup::DEFAULT_SQL_FILENAME;
use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::exec::escape::sql_identifier;
use crate::exec::{CommandSpec, ShellCommand};
use crate::plan::{StepContext, StepKind, StepReport};
use crate::preflight::require_file;
use crate::restore::RestoreRequest;
use crate::tools::{mysql_client, GUNZIP, MYSQL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRestoreTarget {
    pub enabled: bool,
    pub filename: String,
    /// Drop and recreate the database before loading. Destructive.
    pub drop_and_create: bool,
}

impl Default for DatabaseRestoreTarget {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: DEFAULT_SQL_FILENAME.to_string(),
            drop_and_create: false,
        }
    }
}

impl DatabaseRestoreTarget {
    pub fn input_path(&self, backup_dir: &Path) -> PathBuf {
        backup_dir.join(&self.filename)
    }

    /// The destructive pre-step, or `None` when it is not enabled.
    pub fn drop_and_create_command(
        &self,
        db: &DatabaseConfig,
        timeout: Option<Duration>,
    ) -> Option<CommandSpec> {
        if !self.drop_and_create {
            return None;
        }
        let ident = sql_identifier(&db.name);
        let sql = format!("DROP DATABASE IF EXISTS {ident}; CREATE DATABASE {ident};");
        Some(mysql_client(MYSQL, db).option("--execute", &sql).into_spec(timeout))
    }

    pub fn load_command(
        &self,
        db: &DatabaseConfig,
        input: &Path,
        timeout: Option<Duration>,
    ) -> CommandSpec {
        ShellCommand::new(GUNZIP)
            .stdin_from(input)
            .pipe(mysql_client(MYSQL, db).arg(&db.name))
            .into_spec(timeout)
    }
}

pub(crate) async fn restore(
    ctx: &StepContext<'_>,
    request: &RestoreRequest,
    db: &DatabaseConfig,
) -> Result<Vec<StepReport>> {
    let target = &request.database;
    let input = target.input_path(&request.backup_dir);
    require_file(ctx.fs, &input, "backup file")?;

    let mut reports = Vec::new();

    if let Some(spec) = target.drop_and_create_command(db, ctx.timeout) {
        let result = ctx.runner.run(spec).await?;
        reports.push(StepReport::new(StepKind::DropAndCreate, input.clone(), result));
    }

    let result = ctx.runner.run(target.load_command(db, &input, ctx.timeout)).await?;
    reports.push(StepReport::new(StepKind::DatabaseLoad, input, result));

    Ok(reports)
}
