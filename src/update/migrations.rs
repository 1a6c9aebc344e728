// file: src/update/migrations.rs
// version: 1.0.0
// guid: f2c8a6e1-9d07-4b3a-8e5c-4a1b7f0d2c96

//! Versioned SQL migration scripts in `tools/migrations`

use crate::config::ConfigState;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A migration script and the name recorded once it has run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub name: String,
    pub path: PathBuf,
}

pub fn migrations_dir(root: &Path) -> PathBuf {
    root.join("tools").join("migrations")
}

/// Every migration script, ordered by file name
pub fn all_migrations(root: &Path) -> Result<Vec<Migration>> {
    let dir = migrations_dir(root);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut migrations: Vec<Migration> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "sql"))
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            Some(Migration { name, path })
        })
        .collect();
    migrations.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(migrations)
}

/// Migrations not yet recorded in the tool state
pub fn pending_migrations(root: &Path, state: &ConfigState) -> Result<Vec<Migration>> {
    Ok(all_migrations(root)?
        .into_iter()
        .filter(|m| !state.is_migration_applied(&m.name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pending_in_name_order() {
        let temp = TempDir::new().unwrap();
        let dir = migrations_dir(temp.path());
        fs::create_dir_all(&dir).unwrap();
        for name in ["002_unity.sql", "001_char_unlocks.sql", "003_notes.txt"] {
            fs::write(dir.join(name), "").unwrap();
        }

        let mut state = ConfigState::default();
        let names: Vec<String> = pending_migrations(temp.path(), &state)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["001_char_unlocks.sql", "002_unity.sql"]);

        state.mark_migration_applied("001_char_unlocks.sql");
        let pending = pending_migrations(temp.path(), &state).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "002_unity.sql");
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        assert!(all_migrations(temp.path()).unwrap().is_empty());
    }
}
