// file: src/export/mod.rs
// version: 1.0.0
// guid: 1b6e9f03-a2d8-4c57-b914-5e3c7a0d8f26

//! Table export back into the committed `.sql` fixtures

pub mod fixture;
pub mod format;
pub mod rules;

pub use fixture::{FixtureRewriter, RewriteReport};
pub use rules::{ExportRules, FieldRule, SqlVariables};

use crate::database::{is_protected, DatabaseReader, TRIGGERS_FIXTURE};
use crate::{error::XiToolError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory holding one fixture per table
pub fn sql_dir(root: &Path) -> PathBuf {
    root.join("sql")
}

/// Fixture file for `table`
pub fn fixture_path(root: &Path, table: &str) -> PathBuf {
    sql_dir(root).join(format!("{}.sql", table))
}

/// Stems of every `.sql` file directly inside `sql/`, sorted
pub fn fixture_tables(root: &Path) -> Result<Vec<String>> {
    let mut tables: Vec<String> = fs::read_dir(sql_dir(root))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "sql"))
        .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    tables.sort();
    Ok(tables)
}

/// Tables `export --all` writes: every fixture except triggers and protected tables
pub fn exportable_tables(root: &Path) -> Result<Vec<String>> {
    Ok(fixture_tables(root)?
        .into_iter()
        .filter(|t| t != TRIGGERS_FIXTURE && !is_protected(t))
        .collect())
}

/// Refresh the INSERT rows of `table`'s fixture from the database
pub fn export_table<R: DatabaseReader + ?Sized>(
    reader: &mut R,
    root: &Path,
    table: &str,
    rules: &ExportRules,
) -> Result<RewriteReport> {
    let path = fixture_path(root, table);
    if !path.is_file() {
        return Err(XiToolError::fixture(format!(
            "No fixture file for {} at {}",
            table,
            path.display()
        )));
    }

    let data = reader.fetch_table(table)?;
    let source = fs::read_to_string(&path)?;

    let report = FixtureRewriter::new(table, rules)?.rewrite(&source, &data)?;
    if report.rows_unused > 0 {
        warn!(
            "{} has {} rows without a matching INSERT line in {}",
            table,
            report.rows_unused,
            path.display()
        );
    }

    fs::write(&path, &report.content)?;
    debug!("Exported {} rows to {}", report.rows_written, path.display());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exportable_tables_skip_triggers_and_protected() {
        let temp = TempDir::new().unwrap();
        let sql = sql_dir(temp.path());
        fs::create_dir_all(sql.join("backups")).unwrap();
        for name in ["triggers.sql", "chars.sql", "npc_list.sql", "abilities.sql", "notes.txt"] {
            fs::write(sql.join(name), "").unwrap();
        }

        assert_eq!(
            fixture_tables(temp.path()).unwrap(),
            vec!["abilities", "chars", "npc_list", "triggers"]
        );
        assert_eq!(exportable_tables(temp.path()).unwrap(), vec!["abilities", "npc_list"]);
    }
}
