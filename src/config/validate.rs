// src/config/validate.rs

use crate::config::model::{ConfigFile, DatabaseConfig, RawConfigFile};
use crate::errors::{BackupError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::BackupError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.database, raw.paths, raw.process))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    if let Some(db) = &cfg.database {
        validate_database(db)?;
    }
    validate_paths(cfg)?;
    Ok(())
}

fn validate_database(db: &DatabaseConfig) -> Result<()> {
    for (field, value) in [("host", &db.host), ("user", &db.user), ("name", &db.name)] {
        if value.trim().is_empty() {
            return Err(BackupError::ConfigError(format!(
                "[database].{field} must not be empty"
            )));
        }
    }
    // Passed positionally to mysql/mysqldump, where a leading dash is an option.
    if db.name.starts_with('-') {
        return Err(BackupError::ConfigError(format!(
            "[database].name must not start with '-' (got {:?})",
            db.name
        )));
    }
    if db.port == Some(0) {
        return Err(BackupError::ConfigError(
            "[database].port must be between 1 and 65535 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    if cfg.paths.project_root.as_os_str().is_empty() {
        return Err(BackupError::ConfigError(
            "[paths].project_root must not be empty".to_string(),
        ));
    }
    Ok(())
}
