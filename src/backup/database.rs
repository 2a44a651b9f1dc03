// src/backup/database.rs

//! `mysqldump | gzip > database.sql.gz`

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backup::{verify_output, BackupRequest, DEFAULT_SQL_FILENAME};
use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::exec::{CommandSpec, ShellCommand};
use crate::plan::{StepContext, StepKind, StepReport};
use crate::preflight::require_dir;
use crate::tools::{mysql_client, GZIP, MYSQLDUMP};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseDumpTarget {
    pub enabled: bool,
    pub filename: String,
    /// Tables to leave out of the dump, without the database prefix.
    pub ignore_tables: Vec<String>,
    /// Emit `DROP DATABASE` / `CREATE DATABASE` statements in the dump.
    pub add_drop_database: bool,
}

impl Default for DatabaseDumpTarget {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: DEFAULT_SQL_FILENAME.to_string(),
            ignore_tables: Vec::new(),
            add_drop_database: false,
        }
    }
}

impl DatabaseDumpTarget {
    pub fn output_path(&self, target_dir: &Path) -> PathBuf {
        target_dir.join(&self.filename)
    }

    /// Build the dump pipeline writing into `output`.
    ///
    /// Every ignored table becomes its own `--ignore-table=<db>.<table>`
    /// clause. `--add-drop-database` only has an effect together with
    /// `--databases`, so both are emitted as a pair.
    pub fn command(
        &self,
        db: &DatabaseConfig,
        output: &Path,
        timeout: Option<Duration>,
    ) -> CommandSpec {
        let mut dump = mysql_client(MYSQLDUMP, db);
        for table in self.ignore_tables.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            dump = dump.option("--ignore-table", &format!("{}.{}", db.name, table));
        }
        dump = dump
            .flags_if(self.add_drop_database, &["--add-drop-database", "--databases"])
            .arg(&db.name);

        dump.pipe(ShellCommand::new(GZIP).stdout_to(output))
            .into_spec(timeout)
    }
}

pub(crate) async fn dump(
    ctx: &StepContext<'_>,
    request: &BackupRequest,
    db: &DatabaseConfig,
) -> Result<StepReport> {
    require_dir(ctx.fs, &request.target_dir, "target directory")?;

    let output = request.database.output_path(&request.target_dir);
    let spec = request.database.command(db, &output, ctx.timeout);
    let result = ctx.runner.run(spec).await?;
    verify_output(ctx, &output)?;

    Ok(StepReport::new(StepKind::DatabaseDump, output, result))
}
