#![allow(dead_code)]

use std::path::PathBuf;

use sysbackup::backup::BackupRequest;
use sysbackup::config::DatabaseConfig;
use sysbackup::restore::RestoreRequest;

/// Connection settings for a database called `name`.
pub fn database(name: &str) -> DatabaseConfig {
    DatabaseConfig {
        host: "localhost".to_string(),
        port: None,
        user: "backup".to_string(),
        password: Some("s3cret".to_string()),
        name: name.to_string(),
    }
}

/// Builder for `BackupRequest` to simplify test setup.
pub struct BackupRequestBuilder {
    request: BackupRequest,
}

impl BackupRequestBuilder {
    pub fn new(target_dir: &str) -> Self {
        let mut request = BackupRequest::new(target_dir);
        request.project_root = PathBuf::from("/srv/app");
        Self { request }
    }

    pub fn sql(mut self) -> Self {
        self.request.database.enabled = true;
        self
    }

    pub fn ignore_tables(mut self, tables: &str) -> Self {
        self.request.database.ignore_tables = tables.split(',').map(str::to_string).collect();
        self
    }

    pub fn add_drop_database(mut self) -> Self {
        self.request.database.add_drop_database = true;
        self
    }

    pub fn assets(mut self) -> Self {
        self.request.assets.enabled = true;
        self
    }

    pub fn asset_source(mut self, path: &str) -> Self {
        self.request.assets.sources.push(PathBuf::from(path));
        self
    }

    pub fn dereference(mut self) -> Self {
        self.request.assets.dereference = true;
        self
    }

    pub fn change_dir(mut self, dir: &str) -> Self {
        self.request.assets.change_dir = Some(PathBuf::from(dir));
        self
    }

    pub fn build(self) -> BackupRequest {
        self.request
    }
}

/// Builder for `RestoreRequest`.
pub struct RestoreRequestBuilder {
    request: RestoreRequest,
}

impl RestoreRequestBuilder {
    pub fn new(backup_dir: &str) -> Self {
        let mut request = RestoreRequest::new(backup_dir);
        request.project_root = PathBuf::from("/srv/app");
        Self { request }
    }

    pub fn sql(mut self) -> Self {
        self.request.database.enabled = true;
        self
    }

    pub fn drop_and_create(mut self) -> Self {
        self.request.database.drop_and_create = true;
        self
    }

    pub fn assets(mut self) -> Self {
        self.request.assets.enabled = true;
        self
    }

    pub fn unlink_before(mut self) -> Self {
        self.request.assets.unlink_before = true;
        self
    }

    pub fn change_to_dir(mut self, dir: &str) -> Self {
        self.request.assets.change_to_dir = Some(PathBuf::from(dir));
        self
    }

    pub fn build(self) -> RestoreRequest {
        self.request
    }
}
