// file: src/utils/system.rs
// version: 1.0.0
// guid: 2b8f5e1a-7c04-4d39-a6b1-9e3d0f7c2a58

//! Locating the MySQL client binaries

use crate::config::ConfigState;
use crate::{error::XiToolError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// System utility functions
pub struct SystemUtils;

impl SystemUtils {
    /// Run `<program> --version` and report whether it started and succeeded
    pub async fn runs_ok(program: &Path) -> std::io::Result<bool> {
        let status = Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        Ok(status.success())
    }

    /// Directory of `name` on PATH
    pub fn find_on_path(name: &str) -> Option<PathBuf> {
        let found = which::which(name).ok()?;
        let resolved = found.canonicalize().unwrap_or(found);
        resolved.parent().map(Path::to_path_buf)
    }

    /// Make sure `mysql` can be run, updating `state.mysql_bin` from PATH if needed
    ///
    /// Returns `true` when `state` was changed and should be saved.
    pub async fn ensure_mysql_bin(state: &mut ConfigState) -> Result<bool> {
        let mysql = state.binary("mysql");
        match Self::runs_ok(&mysql).await {
            Ok(true) => {
                debug!("Using {}", mysql.display());
                Ok(false)
            }
            Ok(false) => Err(XiToolError::config(
                "Something went wrong while checking for MySQL directory.",
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let dir = Self::find_on_path("mysql").ok_or_else(|| {
                    XiToolError::config("Add MySQL to your system path or set mysql_bin in config.yaml.")
                })?;
                info!("Found MySQL client binaries in {}", dir.display());
                state.mysql_bin = dir.to_string_lossy().into_owned();
                Ok(true)
            }
            Err(e) => Err(XiToolError::config(format!(
                "Something went wrong while checking for MySQL directory: {}",
                e
            ))),
        }
    }
}
