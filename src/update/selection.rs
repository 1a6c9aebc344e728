// file: src/update/selection.rs
// version: 1.0.0
// guid: 3d9b1e74-6a2f-4c08-a7d3-b8e0c5f2a916

//! Choosing which fixtures an import run loads, and in which order

use crate::database::{is_protected, PROTECTED_TABLES, TRIGGERS_FIXTURE};
use crate::export::fixture_path;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Fixtures to load, in import order, before modules and triggers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub tables: Vec<String>,
    pub include_triggers: bool,
}

impl ImportPlan {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && !self.include_triggers
    }

    /// Files in import order: fixtures, then modules, then triggers
    pub fn files(&self, root: &Path, modules: &[PathBuf]) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.tables.iter().map(|t| fixture_path(root, t)).collect();
        files.extend(modules.iter().cloned());
        if self.include_triggers {
            files.push(fixture_path(root, TRIGGERS_FIXTURE));
        }
        files
    }
}

/// Everything a fresh database needs: protected tables first, then the rest
pub fn plan_setup(fixtures: &[String]) -> ImportPlan {
    let available: HashSet<&str> = fixtures.iter().map(String::as_str).collect();

    let mut tables: Vec<String> = PROTECTED_TABLES
        .iter()
        .filter(|t| available.contains(*t))
        .map(|t| t.to_string())
        .collect();

    let rest: BTreeSet<&str> = fixtures
        .iter()
        .map(String::as_str)
        .filter(|t| *t != TRIGGERS_FIXTURE && !is_protected(t))
        .collect();
    tables.extend(rest.into_iter().map(str::to_string));

    ImportPlan {
        tables,
        include_triggers: available.contains(TRIGGERS_FIXTURE),
    }
}

/// Fixtures an update should (re)load
///
/// * tables missing from the schema are always loaded, protected or not
/// * `changed` lists fixtures that differ since the recorded revision; when
///   it is `None`, or `force_all` is set, every non-protected fixture is loaded
/// * changed protected fixtures are never reloaded over live data
/// * triggers follow whenever anything is loaded, since reloading a table
///   drops its triggers
pub fn plan_update(
    fixtures: &[String],
    existing: &[String],
    changed: Option<&[String]>,
    force_all: bool,
) -> ImportPlan {
    let existing: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let has_triggers = fixtures.iter().any(|t| t == TRIGGERS_FIXTURE);

    let candidates = fixtures.iter().map(String::as_str).filter(|t| *t != TRIGGERS_FIXTURE);

    let mut selected: BTreeSet<&str> = candidates
        .clone()
        .filter(|t| !existing.contains(t))
        .collect();

    match changed {
        Some(changed) if !force_all => {
            let changed: HashSet<&str> = changed.iter().map(String::as_str).collect();
            selected.extend(candidates.filter(|t| changed.contains(t) && !is_protected(t)));
        }
        _ => selected.extend(candidates.filter(|t| !is_protected(t))),
    }

    let triggers_changed = changed.is_some_and(|c| c.iter().any(|t| t == TRIGGERS_FIXTURE));

    ImportPlan {
        include_triggers: has_triggers && (!selected.is_empty() || triggers_changed),
        tables: selected.into_iter().map(str::to_string).collect(),
    }
}

/// Table names of changed files that are fixtures directly inside `sql/`
pub fn changed_fixture_tables(root: &Path, changed_files: &[PathBuf]) -> Vec<String> {
    let sql_dir = crate::export::sql_dir(root);
    changed_files
        .iter()
        .filter(|p| p.parent() == Some(sql_dir.as_path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "sql"))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_setup_protected_first_triggers_last() {
        let fixtures = names(&["abilities", "chars", "triggers", "accounts", "zone_settings"]);

        let plan = plan_setup(&fixtures);

        assert_eq!(plan.tables, names(&["accounts", "chars", "abilities", "zone_settings"]));
        assert!(plan.include_triggers);

        let files = plan.files(Path::new("/srv"), &[PathBuf::from("/srv/modules/m.sql")]);
        assert_eq!(files.last(), Some(&PathBuf::from("/srv/sql/triggers.sql")));
        assert_eq!(files[files.len() - 2], PathBuf::from("/srv/modules/m.sql"));
    }

    #[test]
    fn test_update_changed_only() {
        let fixtures = names(&["abilities", "chars", "mob_pools", "triggers"]);
        let existing = names(&["abilities", "chars", "mob_pools"]);
        let changed = names(&["mob_pools", "chars"]);

        let plan = plan_update(&fixtures, &existing, Some(changed.as_slice()), false);

        assert_eq!(plan.tables, names(&["mob_pools"]));
        assert!(plan.include_triggers);
    }

    #[test]
    fn test_update_missing_tables_always_loaded() {
        let fixtures = names(&["abilities", "chars", "mob_pools"]);
        let existing = names(&["abilities"]);

        let plan = plan_update(&fixtures, &existing, Some(&[][..]), false);

        assert_eq!(plan.tables, names(&["chars", "mob_pools"]));
        assert!(!plan.include_triggers);
    }

    #[test]
    fn test_update_without_revision_loads_everything_unprotected() {
        let fixtures = names(&["abilities", "chars", "mob_pools", "triggers"]);
        let existing = names(&["abilities", "chars", "mob_pools"]);

        let unknown = plan_update(&fixtures, &existing, None, false);
        let forced = plan_update(&fixtures, &existing, Some(&[][..]), true);

        assert_eq!(unknown.tables, names(&["abilities", "mob_pools"]));
        assert_eq!(unknown, forced);
    }

    #[test]
    fn test_update_nothing_to_do() {
        let fixtures = names(&["abilities", "triggers"]);
        let existing = names(&["abilities"]);

        let plan = plan_update(&fixtures, &existing, Some(&[][..]), false);

        assert!(plan.is_empty());
    }

    #[test]
    fn test_update_triggers_only_change() {
        let fixtures = names(&["abilities", "triggers"]);
        let existing = names(&["abilities"]);
        let changed = names(&["triggers"]);

        let plan = plan_update(&fixtures, &existing, Some(changed.as_slice()), false);

        assert!(plan.tables.is_empty());
        assert!(plan.include_triggers);
    }

    #[test]
    fn test_changed_fixture_tables() {
        let root = Path::new("/srv");
        let changed = vec![
            PathBuf::from("/srv/sql/npc_list.sql"),
            PathBuf::from("/srv/sql/backups/old.sql"),
            PathBuf::from("/srv/sql/README.md"),
        ];

        assert_eq!(changed_fixture_tables(root, &changed), names(&["npc_list"]));
    }

    #[test]
    fn test_update_empty_change_list_still_loads_missing_tables() {
        let fixtures = names(&["accounts", "abilities", "mob_pools", "triggers"]);
        let existing = names(&["abilities"]);

        let plan = plan_update(&fixtures, &existing, Some(&[][..]), false);

        assert_eq!(plan.tables, names(&["accounts", "mob_pools"]));
        assert!(plan.include_triggers);
        assert!(!plan.is_empty());
    }
}
