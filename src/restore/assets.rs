// src/restore/assets.rs

//! `tar --overwrite -xzf assets.tar.gz`

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backup::DEFAULT_ASSETS_FILENAME;
use crate::errors::Result;
use crate::exec::{CommandSpec, ShellCommand};
use crate::plan::{StepContext, StepKind, StepReport};
use crate::preflight::{ensure_dir, require_file, resolve_under};
use crate::restore::RestoreRequest;
use crate::tools::TAR;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRestoreTarget {
    pub enabled: bool,
    pub filename: String,
    /// Have tar remove existing files (and whole directory trees) before
    /// writing the archived version.
    pub unlink_before: bool,
    /// Extract into this directory, relative to the project root. Created if
    /// missing.
    pub change_to_dir: Option<PathBuf>,
}

impl Default for AssetRestoreTarget {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: DEFAULT_ASSETS_FILENAME.to_string(),
            unlink_before: false,
            change_to_dir: None,
        }
    }
}

impl AssetRestoreTarget {
    pub fn input_path(&self, backup_dir: &Path) -> PathBuf {
        backup_dir.join(&self.filename)
    }

    pub fn command(
        &self,
        input: &Path,
        directory: Option<&Path>,
        timeout: Option<Duration>,
    ) -> CommandSpec {
        let mut tar = ShellCommand::new(TAR)
            .flag("--overwrite")
            .flags_if(self.unlink_before, &["--unlink-first", "--recursive-unlink"]);
        if let Some(dir) = directory {
            tar = tar.flag("--directory").path(dir);
        }
        tar.flag("-xzf").path(input).into_spec(timeout)
    }
}

pub(crate) async fn extract(ctx: &StepContext<'_>, request: &RestoreRequest) -> Result<StepReport> {
    let target = &request.assets;
    let input = target.input_path(&request.backup_dir);
    require_file(ctx.fs, &input, "backup file")?;

    let directory = target
        .change_to_dir
        .as_deref()
        .map(|dir| resolve_under(&request.project_root, dir));
    if let Some(dir) = &directory {
        ensure_dir(ctx.fs, dir, ctx.runner.spawns_processes())?;
    }

    let spec = target.command(&input, directory.as_deref(), ctx.timeout);
    let result = ctx.runner.run(spec).await?;

    Ok(StepReport::new(StepKind::AssetExtract, input, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IN: &str = "/backups/assets.tar.gz";

    #[test]
    fn always_overwrites() {
        let spec = AssetRestoreTarget::default().command(Path::new(IN), None, None);
        assert_eq!(spec.raw(), "tar --overwrite -xzf '/backups/assets.tar.gz'");
    }

    #[test]
    fn unlink_before_adds_both_flags() {
        let target = AssetRestoreTarget {
            unlink_before: true,
            ..Default::default()
        };
        let spec = target.command(Path::new(IN), Some(Path::new("/srv/shop/uploads")), None);

        assert_eq!(
            spec.raw(),
            "tar --overwrite --unlink-first --recursive-unlink --directory '/srv/shop/uploads' \
             -xzf '/backups/assets.tar.gz'"
        );
    }
}
