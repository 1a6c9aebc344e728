// file: src/backup.rs
// version: 1.0.0
// guid: 9e4b7d20-3f1c-4a86-b2e5-6d0a8c9f3b71

//! Database dumps taken before other commands run

use crate::config::ConfigState;
use crate::database::{MysqlDriver, ProcessOutcome, PROTECTED_TABLES};
use crate::Result;
use chrono::{DateTime, Local, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a backup covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupKind {
    /// Only the protected tables
    Lite,
    /// The whole database
    Full,
}

/// Directory backups are written to
pub fn backups_dir(root: &Path) -> PathBuf {
    root.join("sql").join("backups")
}

/// `<db>-<YYYYmmdd-HHMMSS>-<tag>.sql`, tagged `lite`, the recorded revision, or `full`
pub fn backup_file_name<Tz: TimeZone>(
    database: &str,
    at: &DateTime<Tz>,
    kind: BackupKind,
    db_ver: Option<&str>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let tag = match (kind, db_ver) {
        (BackupKind::Lite, _) => "lite",
        (BackupKind::Full, Some(ver)) if !ver.is_empty() => ver,
        (BackupKind::Full, _) => "full",
    };
    format!("{}-{}-{}.sql", database, at.format("%Y%m%d-%H%M%S"), tag)
}

/// Dump the database into the backups directory
pub async fn create_backup(
    driver: &MysqlDriver,
    state: &ConfigState,
    root: &Path,
    kind: BackupKind,
) -> Result<(PathBuf, ProcessOutcome)> {
    let out_dir = backups_dir(root);
    fs::create_dir_all(&out_dir)?;

    let name = backup_file_name(
        &driver.network().database,
        &Local::now(),
        kind,
        state.db_ver.as_deref(),
    );
    let out_file = out_dir.join(name);

    let tables = match kind {
        BackupKind::Lite => Some(&PROTECTED_TABLES[..]),
        BackupKind::Full => None,
    };

    info!("Writing backup to {}", out_file.display());
    let outcome = driver.dump(tables, &out_file).await?;
    Ok((out_file, outcome))
}
