// file: src/cli/commands.rs
// version: 1.0.0
// guid: 6b9d3f07-2e8a-4c51-9d7f-a0c4e1b8f325

//! Command implementations for the CLI
//!
//! Every command returns the process status: 0 on success, -1 on
//! validation, import or export failures, or the exit code of a failed
//! client binary.

use super::args::{Cli, Commands};
use super::output::{print_errors, print_green, print_red};
use crate::{
    backup::{create_backup, BackupKind},
    config::{state_path, ConfigState, NetworkSettings, Settings},
    database::{DatabaseReader, MysqlConnection, MysqlDriver},
    error::XiToolError,
    export::{export_table, exportable_tables, fixture_tables, ExportRules},
    logging::{with_async_operation_span, with_operation_span},
    update::{
        all_migrations, changed_fixture_tables, module_sql_files, pending_migrations, plan_setup,
        plan_update, GitRepo,
    },
    utils::SystemUtils,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Everything a command needs from disk
pub struct Context {
    pub root: PathBuf,
    pub network: NetworkSettings,
    pub state: ConfigState,
    state_path: PathBuf,
}

impl Context {
    /// Load settings and tool state for the checkout at `root`
    pub fn load(root: &Path) -> crate::Result<Self> {
        let settings = Settings::load(root)?;
        let network = settings.network()?;
        let state_path = state_path(root);
        let state = ConfigState::load(&state_path)?;

        Ok(Self {
            root: root.to_path_buf(),
            network,
            state,
            state_path,
        })
    }

    pub fn save_state(&self) -> crate::Result<()> {
        self.state.save(&self.state_path)
    }
}

/// Check arguments that must hold before anything touches the database
pub fn validate_command(command: &Commands, network: &NetworkSettings) -> Result<(), String> {
    match command {
        Commands::Setup { yes: false, .. } => Err(
            "This command will drop the database if it exists. You must supply the \"--yes\" flag."
                .to_string(),
        ),
        Commands::Setup { database_name, .. } if *database_name != network.database => Err(format!(
            "\"{}\" does not match database \"{}\" in network.lua.",
            database_name, network.database
        )),
        Commands::Import { yes: false, .. } => {
            Err("You must supply the \"--yes\" flag when manually importing files.".to_string())
        }
        Commands::Import { import_file, .. } if !import_file.exists() => Err(format!(
            "Import file does not exist or is an incomplete path. ({})",
            import_file.display()
        )),
        Commands::Export {
            table_name: None,
            all: false,
        } => Err("You must supply a table to export, or supply the \"--all\" flag.".to_string()),
        _ => Ok(()),
    }
}

/// Run the parsed command line, recording progress in `status`
pub async fn run(cli: Cli, status: Arc<AtomicI32>) -> i32 {
    let set = |code: i32| {
        status.store(code, Ordering::SeqCst);
        code
    };

    let mut ctx = match Context::load(&cli.root) {
        Ok(ctx) => ctx,
        Err(e) => {
            print_red(&e.to_string());
            return set(-1);
        }
    };

    if let Some(command) = &cli.command {
        if let Err(msg) = validate_command(command, &ctx.network) {
            print_red(&msg);
            return set(-1);
        }
    }

    match SystemUtils::ensure_mysql_bin(&mut ctx.state).await {
        Ok(true) => {
            if let Err(e) = ctx.save_state() {
                warn!("Could not save tool state: {}", e);
            }
        }
        Ok(false) => {}
        Err(e) => {
            print_red(&e.to_string());
            return set(-1);
        }
    }

    let driver = MysqlDriver::new(ctx.network.clone(), &ctx.state);
    let driver = &driver;

    if cli.backup || cli.lite {
        let kind = if cli.lite { BackupKind::Lite } else { BackupKind::Full };
        let ctx = &ctx;
        let code =
            with_async_operation_span("backup", move || backup_command(ctx, driver, kind)).await;
        if set(code) != 0 {
            return code;
        }
    }

    let ctx = &mut ctx;
    let code = match cli.command {
        None => 0,
        Some(Commands::Setup { .. }) => {
            with_async_operation_span("setup", move || setup_command(ctx, driver)).await
        }
        Some(Commands::Update { all }) => {
            with_async_operation_span("update", move || update_command(ctx, driver, all)).await
        }
        Some(Commands::Import { import_file, .. }) => {
            with_async_operation_span("import", move || async move {
                import_command(driver, &import_file).await
            })
            .await
        }
        Some(Commands::Export { table_name, all }) => {
            export_command(ctx, table_name, all, Arc::clone(&status)).await
        }
    };

    set(code)
}

async fn backup_command(ctx: &Context, driver: &MysqlDriver, kind: BackupKind) -> i32 {
    println!("Creating backup...");
    match create_backup(driver, &ctx.state, &ctx.root, kind).await {
        Ok((path, outcome)) => {
            if outcome.errors.is_empty() {
                print_green(&format!("Backup created at {}", path.display()));
            } else {
                print_errors("Errors occurred while creating backup.", &outcome.errors);
            }
            outcome.code
        }
        Err(e) => {
            print_red(&format!("Errors occurred while creating backup: {}", e));
            -1
        }
    }
}

/// Import each existing file in order, gathering every error line
async fn import_files(driver: &MysqlDriver, files: &[PathBuf]) -> Vec<String> {
    let mut errors = Vec::new();
    for file in files {
        if !file.exists() {
            warn!("Skipping missing file {}", file.display());
            continue;
        }

        println!("Importing {}", file.display());
        match driver.import_file(file).await {
            Ok(outcome) => errors.extend(outcome.errors),
            Err(e) => errors.push(e.to_string()),
        }
    }
    errors
}

async fn setup_command(ctx: &mut Context, driver: &MysqlDriver) -> i32 {
    let database = ctx.network.database.clone();
    println!("Creating database \"{}\"...", database);

    let mut errors = Vec::new();
    match driver.drop_database().await {
        Ok(outcome) => errors.extend(outcome.errors),
        Err(e) => {
            print_red(&e.to_string());
            return -1;
        }
    }

    ctx.state.db_ver = None;
    ctx.state.migrations.clear();
    if let Err(e) = ctx.save_state() {
        warn!("Could not save tool state: {}", e);
    }

    match driver.create_database().await {
        Ok(outcome) if outcome.code != 0 => {
            print_errors("Errors occurred while setting up the database.", &outcome.errors);
            return outcome.code;
        }
        Ok(outcome) => errors.extend(outcome.errors),
        Err(e) => {
            print_red(&e.to_string());
            return -1;
        }
    }

    let files = match setup_files(&ctx.root) {
        Ok(files) => files,
        Err(e) => {
            print_red(&e.to_string());
            return -1;
        }
    };
    errors.extend(import_files(driver, &files).await);

    if !errors.is_empty() {
        print_errors("Errors occurred while setting up the database.", &errors);
        return -1;
    }

    ctx.state.db_ver = GitRepo::new(&ctx.root).current_revision().await;
    match all_migrations(&ctx.root) {
        Ok(migrations) => {
            for migration in migrations {
                ctx.state.mark_migration_applied(&migration.name);
            }
        }
        Err(e) => warn!("Could not list migrations: {}", e),
    }
    if let Err(e) = ctx.save_state() {
        print_red(&e.to_string());
        return -1;
    }

    print_green(&format!("Database \"{}\" setup complete.", database));
    0
}

fn setup_files(root: &Path) -> crate::Result<Vec<PathBuf>> {
    let plan = plan_setup(&fixture_tables(root)?);
    let modules = module_sql_files(root)?;
    Ok(plan.files(root, &modules))
}

fn connect(network: &NetworkSettings) -> Option<MysqlConnection> {
    match MysqlConnection::connect(network, true) {
        Ok(conn) => Some(conn),
        Err(e) if e.is_access_denied() => {
            print_red("Database access denied, check network.lua.");
            None
        }
        Err(e) => {
            print_red(&e.to_string());
            None
        }
    }
}

/// Fixture tables changed since the recorded revision, when both ends are known
///
/// A failed diff is reported and treated as "nothing changed", so tables
/// missing from the schema and modules are still imported.
async fn changed_since_last_update(ctx: &Context, current: Option<&str>) -> Option<Vec<String>> {
    let (from, to) = match (ctx.state.db_ver.as_deref(), current) {
        (Some(from), Some(to)) => (from, to),
        _ => return None,
    };

    match GitRepo::new(&ctx.root).changed_files(from, to, "sql").await {
        Ok(files) => Some(changed_fixture_tables(&ctx.root, &files)),
        Err(e) => {
            print_red("Error checking diffs.\nCheck that db_ver hash is valid.");
            debug!("{}", e);
            Some(Vec::new())
        }
    }
}

async fn update_command(ctx: &mut Context, driver: &MysqlDriver, all: bool) -> i32 {
    let network = ctx.network.clone();
    let existing = run_blocking(move || {
        let mut conn = connect(&network)?;
        match conn.existing_tables() {
            Ok(tables) => Some(tables),
            Err(e) => {
                print_red(&e.to_string());
                None
            }
        }
    })
    .await;
    let Some(existing) = existing else {
        return -1;
    };

    let fixtures = match fixture_tables(&ctx.root) {
        Ok(fixtures) => fixtures,
        Err(e) => {
            print_red(&e.to_string());
            return -1;
        }
    };

    let current = GitRepo::new(&ctx.root).current_revision().await;
    let changed = if all {
        None
    } else {
        changed_since_last_update(ctx, current.as_deref()).await
    };

    let plan = plan_update(&fixtures, &existing, changed.as_deref(), all);
    debug!("Update plan: {:?}", plan);

    let modules = match module_sql_files(&ctx.root) {
        Ok(modules) => modules,
        Err(e) => {
            print_red(&e.to_string());
            return -1;
        }
    };
    let files = plan.files(&ctx.root, &modules);

    let mut errors = import_files(driver, &files).await;

    let migrations = match pending_migrations(&ctx.root, &ctx.state) {
        Ok(migrations) => migrations,
        Err(e) => {
            print_red(&e.to_string());
            return -1;
        }
    };
    for migration in migrations {
        println!("Running migration {}", migration.name);
        match driver.import_file(&migration.path).await {
            Ok(outcome) if outcome.is_success() => ctx.state.mark_migration_applied(&migration.name),
            Ok(outcome) => errors.extend(outcome.errors),
            Err(e) => errors.push(e.to_string()),
        }
    }

    if !errors.is_empty() {
        print_errors("Errors occurred while updating the database.", &errors);
        if let Err(e) = ctx.save_state() {
            warn!("Could not save tool state: {}", e);
        }
        return -1;
    }

    if current.is_some() {
        ctx.state.db_ver = current;
    }
    if let Err(e) = ctx.save_state() {
        print_red(&e.to_string());
        return -1;
    }

    if plan.is_empty() {
        print_green("Database is up to date.");
    } else {
        print_green("Database update complete.");
    }
    0
}

async fn import_command(driver: &MysqlDriver, file: &Path) -> i32 {
    println!("Importing {}...", file.display());
    match driver.import_file(file).await {
        Ok(outcome) if outcome.errors.is_empty() => {
            print_green(&format!("Imported {}", file.display()));
            0
        }
        Ok(outcome) => {
            print_errors(
                &format!("Errors occurred while importing {}.", file.display()),
                &outcome.errors,
            );
            -1
        }
        Err(e) => {
            print_red(&e.to_string());
            -1
        }
    }
}

/// Run blocking client-library work off the runtime thread so Ctrl+C stays responsive
async fn run_blocking<T, F>(f: F) -> Option<T>
where
    F: FnOnce() -> Option<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) => {
            print_red(&format!("Database task failed: {}", e));
            None
        }
    }
}

async fn export_command(
    ctx: &Context,
    table: Option<String>,
    all: bool,
    status: Arc<AtomicI32>,
) -> i32 {
    let network = ctx.network.clone();
    let root = ctx.root.clone();

    run_blocking(move || {
        Some(with_operation_span("export", || {
            export_with_connection(&network, &root, table.as_deref(), all, &status)
        }))
    })
    .await
    .unwrap_or(-1)
}

fn export_with_connection(
    network: &NetworkSettings,
    root: &Path,
    table: Option<&str>,
    all: bool,
    status: &AtomicI32,
) -> i32 {
    let Some(mut conn) = connect(network) else {
        return -1;
    };

    let tables = if all {
        match exportable_tables(root) {
            Ok(tables) => tables,
            Err(e) => {
                print_red(&e.to_string());
                return -1;
            }
        }
    } else {
        table.map(str::to_string).into_iter().collect()
    };

    let rules = ExportRules::default();
    let failures = export_tables(&mut conn, root, &tables, &rules, status);

    if failures == 0 {
        print_green("Export complete.");
        0
    } else {
        print_red(&format!("Export finished with {} failed table(s).", failures));
        -1
    }
}

/// Export each table, reporting failures without stopping; returns the failure count
///
/// `status` is set to -1 on the first failure so an interrupt reports it.
pub fn export_tables<R: DatabaseReader + ?Sized>(
    reader: &mut R,
    root: &Path,
    tables: &[String],
    rules: &ExportRules,
    status: &AtomicI32,
) -> usize {
    let mut failures = 0;
    for table in tables {
        println!("Exporting {}...", table);
        if let Err(e) = export_table(reader, root, table, rules) {
            error!("Export of {} failed: {}", table, e);
            let msg = match e {
                XiToolError::DatabaseError(msg) => msg,
                other => other.to_string(),
            };
            print_red(&format!("Database error: {}", msg));
            status.store(-1, Ordering::SeqCst);
            failures += 1;
        }
    }
    failures
}
