// file: src/update/mod.rs
// version: 1.0.0
// guid: 7c1f4a92-e8b3-4d56-9f0a-2b6d8e4c1a37

//! Deciding what an update or setup imports

pub mod git;
pub mod migrations;
pub mod modules;
pub mod selection;

pub use git::GitRepo;
pub use migrations::{all_migrations, pending_migrations, Migration};
pub use modules::module_sql_files;
pub use selection::{changed_fixture_tables, plan_setup, plan_update, ImportPlan};
