// file: src/config/state.rs
// version: 1.0.0
// guid: 2a9d6e15-4f7b-4c3e-8d02-b5e1a7c9f036

//! Persisted tool state (`tools/config.yaml`)

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// State remembered between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigState {
    /// Source revision the database was last built or updated from
    #[serde(default)]
    pub db_ver: Option<String>,
    /// Directory containing mysql, mysqladmin and mysqldump; empty means PATH
    #[serde(default)]
    pub mysql_bin: String,
    /// Migration scripts already applied to the database
    #[serde(default)]
    pub migrations: Vec<String>,
}

/// Where the state file lives for a project root
pub fn state_path(root: &Path) -> PathBuf {
    root.join("tools").join("config.yaml")
}

impl ConfigState {
    /// Read the state file, writing a default one when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            // An empty YAML document deserializes to unit, not a mapping
            if content.trim().is_empty() {
                return Ok(Self::default());
            }
            Ok(serde_yaml::from_str(&content)?)
        } else {
            let state = Self::default();
            state.save(path)?;
            Ok(state)
        }
    }

    /// Write the state file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        debug!("Wrote tool state to {}", path.display());
        Ok(())
    }

    /// Full path of one of the client binaries
    pub fn binary(&self, name: &str) -> PathBuf {
        if self.mysql_bin.is_empty() {
            PathBuf::from(name)
        } else {
            Path::new(&self.mysql_bin).join(name)
        }
    }

    pub fn is_migration_applied(&self, name: &str) -> bool {
        self.migrations.iter().any(|m| m == name)
    }

    pub fn mark_migration_applied(&mut self, name: &str) {
        if !self.is_migration_applied(name) {
            self.migrations.push(name.to_string());
        }
    }
}
