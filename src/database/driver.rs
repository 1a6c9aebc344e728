// file: src/database/driver.rs
// version: 1.0.0
// guid: 4c8e2a90-d1f7-4b36-9e05-a6b3c7d2e184

//! Vendor client binaries
//!
//! Every statement that changes the database goes through `mysql`,
//! `mysqladmin` or `mysqldump`. Their stderr is collected line by line and
//! handed back to the caller, which decides how to report it.

use crate::config::{ConfigState, NetworkSettings};
use crate::{error::XiToolError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Emitted by every client binary when `-p<password>` is used
pub const PASSWORD_WARNING: &str = "Using a password on the command line interface can be insecure";

/// Exit status and filtered stderr of a finished client binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub code: i32,
    pub errors: Vec<String>,
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        self.code == 0 && self.errors.is_empty()
    }
}

/// Split stderr into lines, dropping the password warning
pub fn fetch_errors(stderr: &str) -> Vec<String> {
    stderr
        .lines()
        .filter(|line| !line.contains(PASSWORD_WARNING))
        .map(str::to_string)
        .collect()
}

/// Runs the MySQL client binaries against the configured server
pub struct MysqlDriver {
    network: NetworkSettings,
    mysql: PathBuf,
    mysqladmin: PathBuf,
    mysqldump: PathBuf,
}

impl MysqlDriver {
    pub fn new(network: NetworkSettings, state: &ConfigState) -> Self {
        Self {
            network,
            mysql: state.binary("mysql"),
            mysqladmin: state.binary("mysqladmin"),
            mysqldump: state.binary("mysqldump"),
        }
    }

    pub fn network(&self) -> &NetworkSettings {
        &self.network
    }

    fn credential_args(&self) -> Vec<String> {
        vec![
            format!("-h{}", self.network.host),
            format!("-P{}", self.network.port),
            format!("-u{}", self.network.login),
            format!("-p{}", self.network.password),
        ]
    }

    /// Run a query with the `mysql` binary, optionally against a schema
    pub async fn query(&self, sql: &str, use_database: bool) -> Result<ProcessOutcome> {
        let mut args = self.credential_args();
        if use_database {
            args.push(self.network.database.clone());
        }
        args.push("-e".to_string());
        args.push(sql.to_string());

        run_captured(&self.mysql, &args).await
    }

    /// Feed a `.sql` file to the server with key checks disabled
    pub async fn import_file(&self, file: &Path) -> Result<ProcessOutcome> {
        let sql = import_statement(file);
        self.query(&sql, true).await
    }

    pub async fn drop_database(&self) -> Result<ProcessOutcome> {
        let sql = format!("DROP DATABASE IF EXISTS `{}`;", self.network.database);
        self.query(&sql, false).await
    }

    pub async fn create_database(&self) -> Result<ProcessOutcome> {
        let mut args = self.credential_args();
        args.push("CREATE".to_string());
        args.push(self.network.database.clone());

        run_captured(&self.mysqladmin, &args).await
    }

    /// Dump the schema, or only `tables`, into `out_file`
    pub async fn dump(&self, tables: Option<&[&str]>, out_file: &Path) -> Result<ProcessOutcome> {
        let mut args = vec!["--hex-blob".to_string(), "--add-drop-trigger".to_string()];
        args.extend(self.credential_args());
        args.push(self.network.database.clone());
        if let Some(tables) = tables {
            args.extend(tables.iter().map(|t| t.to_string()));
        }

        let outfile = File::create(out_file)?;
        debug!("Running {} into {}", self.mysqldump.display(), out_file.display());

        let output = Command::new(&self.mysqldump)
            .args(&args)
            .stdout(Stdio::from(outfile))
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| spawn_error(&self.mysqldump, e))?;

        Ok(ProcessOutcome {
            code: output.status.code().unwrap_or(-1),
            errors: fetch_errors(&String::from_utf8_lossy(&output.stderr)),
        })
    }
}

/// The statement handed to `mysql -e` when importing a file
pub fn import_statement(file: &Path) -> String {
    let file = file.to_string_lossy().replace('\\', "/");
    format!(
        "SET autocommit=0; SET unique_checks=0; SET foreign_key_checks=0; SOURCE {}; \
         SET unique_checks=1; SET foreign_key_checks=1; COMMIT;",
        file
    )
}

async fn run_captured(program: &Path, args: &[String]) -> Result<ProcessOutcome> {
    debug!("Running {} ({} args)", program.display(), args.len());

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| spawn_error(program, e))?;

    Ok(ProcessOutcome {
        code: output.status.code().unwrap_or(-1),
        errors: fetch_errors(&String::from_utf8_lossy(&output.stderr)),
    })
}

fn spawn_error(program: &Path, e: std::io::Error) -> XiToolError {
    XiToolError::ProcessError {
        command: program.display().to_string(),
        exit_code: None,
        stderr: format!("Failed to execute command: {}", e),
    }
}
