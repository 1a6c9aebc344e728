// file: src/config/settings.rs
// version: 1.0.0
// guid: c41e7b02-9a3d-4e6f-b185-2d7c0f9e4a63

//! Flat settings file loading
//!
//! Settings live in `settings/default/*.lua` with per-server overrides in
//! `settings/*.lua`. Only simple `KEY = "value", -- comment` lines are
//! understood; everything else in the files is ignored.

use crate::{error::XiToolError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Settings grouped by the stem of the file they came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    groups: BTreeMap<String, BTreeMap<String, String>>,
}

/// Connection parameters read from the `network` settings group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    pub host: String,
    pub port: u16,
    pub login: String,
    pub password: String,
    pub database: String,
}

impl Settings {
    /// Load the defaults directory, then the overrides directory, below `root`
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        Self::load_from_dirs(&[
            root.join("settings").join("default"),
            root.join("settings"),
        ])
    }

    /// Load every file from each directory in order; later directories win
    pub fn load_from_dirs(dirs: &[PathBuf]) -> Result<Self> {
        let mut settings = Self::default();
        for dir in dirs {
            if !dir.is_dir() {
                debug!("Settings directory {} not present, skipping", dir.display());
                continue;
            }

            let mut files: Vec<PathBuf> = fs::read_dir(dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file())
                .collect();
            files.sort();

            for file in files {
                if let Err(e) = settings.merge_file(&file) {
                    warn!("Error populating settings from {}: {}", file.display(), e);
                }
            }
        }
        Ok(settings)
    }

    /// Merge one settings file into the group named after its stem
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let group = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| XiToolError::config(format!("Bad settings path {}", path.display())))?;

        let content = fs::read_to_string(path)?;
        let entries = self.groups.entry(group).or_default();
        for line in content.lines() {
            if let Some((key, value)) = parse_line(line) {
                entries.insert(key, value);
            }
        }
        Ok(())
    }

    /// Look up a single value
    pub fn get(&self, group: &str, key: &str) -> Option<&str> {
        self.groups.get(group)?.get(key).map(String::as_str)
    }

    /// Typed view of the `network` group
    pub fn network(&self) -> Result<NetworkSettings> {
        let require = |key: &str| -> Result<String> {
            self.get("network", key)
                .map(str::to_string)
                .ok_or_else(|| XiToolError::config(format!("{} is not set in network settings", key)))
        };

        let port = require("SQL_PORT")?;
        let port = port
            .parse::<u16>()
            .map_err(|_| XiToolError::config(format!("Invalid SQL_PORT: {}", port)))?;

        let network = NetworkSettings {
            host: require("SQL_HOST")?,
            port,
            login: require("SQL_LOGIN")?,
            password: require("SQL_PASSWORD")?,
            database: require("SQL_DATABASE")?,
        };

        if network.database.is_empty() {
            return Err(XiToolError::config("SQL_DATABASE cannot be empty"));
        }

        Ok(network)
    }
}

/// Parse one `KEY = "value", -- comment` line
///
/// Returns `None` for lines without `=` and for commented-out keys.
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.starts_with("--") {
        return None;
    }

    let mut value = value.trim();
    if let Some(idx) = value.find("--") {
        value = value[..idx].trim();
    }
    value = value.strip_prefix('"').unwrap_or(value);
    value = value.strip_suffix(',').unwrap_or(value);
    value = value.strip_suffix('"').unwrap_or(value);

    Some((key.to_string(), value.to_string()))
}
