// src/tools.rs

//! Names of the external tools and the command fragments shared between
//! backup and restore.

use crate::config::DatabaseConfig;
use crate::exec::ShellCommand;

pub const MYSQLDUMP: &str = "mysqldump";
pub const MYSQL: &str = "mysql";
pub const GZIP: &str = "gzip";
pub const GUNZIP: &str = "gunzip";
pub const TAR: &str = "tar";

/// Start a `mysql`/`mysqldump` invocation with the connection options.
///
/// The password, when configured, is registered as a secret so it is masked
/// in the trace line.
pub fn mysql_client(program: &str, db: &DatabaseConfig) -> ShellCommand {
    let mut cmd = ShellCommand::new(program).option("--host", &db.host);
    if let Some(port) = db.port {
        cmd = cmd.option("--port", &port.to_string());
    }
    cmd = cmd.option("--user", &db.user);
    if let Some(password) = &db.password {
        cmd = cmd.secret_option("--password", password);
    }
    cmd
}
