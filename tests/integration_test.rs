// file: tests/integration_test.rs
// version: 1.0.0
// guid: 7d2f0b9e-4c61-4a38-b1e7-6f3a9c0d5e27

//! Integration tests for xitool

use assert_cmd::Command;
use chrono::{TimeZone, Utc};
use predicates::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use xitool::{
    backup::{backup_file_name, BackupKind},
    config::{ConfigState, Settings},
    database::{ColumnKind, ColumnMeta, DatabaseReader, SqlValue, TableRows},
    export::{export_table, ExportRules},
    update::{plan_setup, plan_update},
    Result, XiToolError,
};

const NETWORK_LUA: &str = r#"xi = xi or {}
xi.settings = xi.settings or {}

xi.settings.network =
{
    SQL_HOST     = "127.0.0.1",
    SQL_PORT     = 3306,
    SQL_LOGIN    = "xi",
    SQL_PASSWORD = "password",
    SQL_DATABASE = "xidb",
}
"#;

/// A server checkout with network settings and an empty sql/ directory
fn checkout() -> TempDir {
    let dir = TempDir::new().unwrap();
    let default = dir.path().join("settings").join("default");
    fs::create_dir_all(&default).unwrap();
    fs::write(default.join("network.lua"), NETWORK_LUA).unwrap();
    fs::create_dir_all(dir.path().join("sql")).unwrap();
    dir
}

struct FakeReader {
    tables: HashMap<String, TableRows>,
}

impl DatabaseReader for FakeReader {
    fn fetch_table(&mut self, table: &str) -> Result<TableRows> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| XiToolError::database(format!("Table '{}' doesn't exist", table)))
    }

    fn existing_tables(&mut self) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_settings_overrides_win_over_defaults() -> Result<()> {
    let dir = checkout();
    fs::write(
        dir.path().join("settings").join("network.lua"),
        "xi.settings.network =\n{\n    SQL_PASSWORD = \"secret\", -- local\n}\n",
    )?;

    let settings = Settings::load(dir.path())?;
    let network = settings.network()?;

    assert_eq!(network.host, "127.0.0.1");
    assert_eq!(network.port, 3306);
    assert_eq!(network.password, "secret");
    assert_eq!(network.database, "xidb");

    Ok(())
}

#[test]
fn test_state_file_created_on_first_load() -> Result<()> {
    let dir = checkout();
    let path = xitool::config::state_path(dir.path());

    let state = ConfigState::load(&path)?;
    assert!(path.is_file());
    assert!(state.db_ver.is_none());

    Ok(())
}

#[test]
fn test_export_round_trip_keeps_fixture_layout() -> Result<()> {
    let dir = checkout();
    let fixture = dir.path().join("sql").join("mob_droplist.sql");
    let source = "\
-- Drop lists
SET @ALWAYS = 1000;
SET @VRARE = 10;

LOCK TABLES `mob_droplist` WRITE;
INSERT INTO `mob_droplist` VALUES (1,0,0,1000,4358,@VRARE); -- Hare Meat
INSERT INTO `mob_droplist` VALUES (1,0,0,1000,4359,@ALWAYS);
UNLOCK TABLES;
";
    fs::write(&fixture, source)?;

    let columns = vec![
        ColumnMeta::new("dropId", ColumnKind::Integer),
        ColumnMeta::new("dropType", ColumnKind::Integer),
        ColumnMeta::new("groupId", ColumnKind::Integer),
        ColumnMeta::new("groupRate", ColumnKind::Integer),
        ColumnMeta::new("itemId", ColumnKind::Integer),
        ColumnMeta::new("itemRate", ColumnKind::Integer),
    ];
    let row = |item: i64, rate: i64| {
        vec![
            SqlValue::Int(1),
            SqlValue::Int(0),
            SqlValue::Int(0),
            SqlValue::Int(1000),
            SqlValue::Int(item),
            SqlValue::Int(rate),
        ]
    };
    let rows = TableRows {
        columns,
        rows: vec![row(4358, 1000), row(4359, 10)],
    };
    let mut reader = FakeReader {
        tables: HashMap::from([("mob_droplist".to_string(), rows)]),
    };

    let report = export_table(&mut reader, dir.path(), "mob_droplist", &ExportRules::default())?;
    assert_eq!(report.rows_written, 2);
    assert_eq!(report.rows_unused, 0);

    let content = fs::read_to_string(&fixture)?;
    assert!(content.starts_with("-- Drop lists\nSET @ALWAYS = 1000;\n"));
    assert!(content.contains("INSERT INTO `mob_droplist` VALUES (1,0,0,1000,4358,@ALWAYS); -- Hare Meat\n"));
    assert!(content.contains("INSERT INTO `mob_droplist` VALUES (1,0,0,1000,4359,@VRARE);\n"));
    assert!(content.ends_with("UNLOCK TABLES;\n"));

    Ok(())
}

#[test]
fn test_export_missing_fixture_fails() {
    let dir = checkout();
    let mut reader = FakeReader {
        tables: HashMap::new(),
    };

    let result = export_table(&mut reader, dir.path(), "item_basic", &ExportRules::default());
    assert!(matches!(result, Err(XiToolError::FixtureError(_))));
}

#[test]
fn test_setup_plan_orders_protected_tables_first() {
    let fixtures = strings(&["abilities", "accounts", "chars", "item_basic", "triggers"]);
    let plan = plan_setup(&fixtures);

    assert_eq!(plan.tables, strings(&["accounts", "chars", "abilities", "item_basic"]));
    assert!(plan.include_triggers);
}

#[test]
fn test_update_plan_puts_triggers_after_modules() {
    let root = Path::new("/srv/server");
    let fixtures = strings(&["item_basic", "mob_groups", "triggers"]);
    let existing = strings(&["item_basic", "mob_groups"]);
    let changed = strings(&["mob_groups"]);

    let plan = plan_update(&fixtures, &existing, Some(changed.as_slice()), false);
    let module = root.join("modules").join("custom").join("custom.sql");
    let files = plan.files(root, std::slice::from_ref(&module));

    assert_eq!(
        files,
        vec![
            root.join("sql").join("mob_groups.sql"),
            module,
            root.join("sql").join("triggers.sql"),
        ]
    );
}

#[test]
fn test_backup_names() {
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();

    assert_eq!(
        backup_file_name("xidb", &at, BackupKind::Lite, Some("1a2b3c4d")),
        "xidb-20240309-070501-lite.sql"
    );
    assert_eq!(
        backup_file_name("xidb", &at, BackupKind::Full, Some("1a2b3c4d")),
        "xidb-20240309-070501-1a2b3c4d.sql"
    );
    assert_eq!(
        backup_file_name("xidb", &at, BackupKind::Full, None),
        "xidb-20240309-070501-full.sql"
    );
}

#[test]
fn test_cli_setup_requires_yes() {
    let dir = checkout();

    Command::cargo_bin("xitool")
        .unwrap()
        .args(["--root", dir.path().to_str().unwrap(), "setup", "xidb"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"--yes\""));
}

#[test]
fn test_cli_setup_rejects_other_database() {
    let dir = checkout();

    Command::cargo_bin("xitool")
        .unwrap()
        .args(["--root", dir.path().to_str().unwrap(), "setup", "otherdb", "--yes"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("does not match database \"xidb\""));
}

#[test]
fn test_cli_import_missing_file() {
    let dir = checkout();
    let missing = dir.path().join("nope.sql");

    Command::cargo_bin("xitool")
        .unwrap()
        .args([
            "--root",
            dir.path().to_str().unwrap(),
            "import",
            missing.to_str().unwrap(),
            "--yes",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Import file does not exist"));
}

#[test]
fn test_cli_export_requires_table_or_all() {
    let dir = checkout();

    Command::cargo_bin("xitool")
        .unwrap()
        .args(["--root", dir.path().to_str().unwrap(), "export"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("--all"));
}
