// src/backup/assets.rs

//! `tar -czf assets.tar.gz <sources>`

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backup::{verify_output, BackupRequest, DEFAULT_ASSETS_FILENAME};
use crate::errors::Result;
use crate::exec::{CommandSpec, ShellCommand};
use crate::plan::{StepContext, StepKind, StepReport};
use crate::preflight::{require_dir, resolve_under};
use crate::tools::TAR;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetArchiveTarget {
    pub enabled: bool,
    pub filename: String,
    /// Paths to archive; empty means everything in the working directory.
    pub sources: Vec<PathBuf>,
    /// Archive the files symlinks point to instead of the links.
    pub dereference: bool,
    /// Directory tar changes into before archiving, relative to the project
    /// root. Must exist.
    pub change_dir: Option<PathBuf>,
}

impl Default for AssetArchiveTarget {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: DEFAULT_ASSETS_FILENAME.to_string(),
            sources: Vec::new(),
            dereference: false,
            change_dir: None,
        }
    }
}

impl AssetArchiveTarget {
    pub fn output_path(&self, target_dir: &Path) -> PathBuf {
        target_dir.join(&self.filename)
    }

    /// Build the archive command. `directory` is the already-resolved
    /// change-directory, if any.
    pub fn command(
        &self,
        output: &Path,
        directory: Option<&Path>,
        timeout: Option<Duration>,
    ) -> CommandSpec {
        let mut tar = ShellCommand::new(TAR).flags_if(self.dereference, &["--dereference"]);
        if let Some(dir) = directory {
            tar = tar.flag("--directory").path(dir);
        }
        // `--` keeps a source that starts with a dash from being read as an option.
        tar = tar.flag("-czf").path(output).flag("--");

        if self.sources.is_empty() {
            tar = tar.arg(".");
        } else {
            for source in &self.sources {
                tar = tar.path(source);
            }
        }

        tar.into_spec(timeout)
    }
}

pub(crate) async fn archive(ctx: &StepContext<'_>, request: &BackupRequest) -> Result<StepReport> {
    let target = &request.assets;
    require_dir(ctx.fs, &request.target_dir, "target directory")?;

    let directory = target
        .change_dir
        .as_deref()
        .map(|dir| resolve_under(&request.project_root, dir));
    if let Some(dir) = &directory {
        require_dir(ctx.fs, dir, "directory")?;
    }

    let output = target.output_path(&request.target_dir);
    let spec = target.command(&output, directory.as_deref(), ctx.timeout);
    let result = ctx.runner.run(spec).await?;
    verify_output(ctx, &output)?;

    Ok(StepReport::new(StepKind::AssetArchive, output, result))
}
