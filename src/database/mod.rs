// file: src/database/mod.rs
// version: 1.0.0
// guid: 0d5c9e27-a18b-4f3e-b6d4-7a2e1c8f9b60

//! Database access
//!
//! Reads go through a client-library connection; everything that changes
//! the server is delegated to the vendor binaries.

pub mod connection;
pub mod driver;
pub mod protected;
pub mod rows;

pub use connection::{DatabaseReader, MysqlConnection};
pub use driver::{fetch_errors, MysqlDriver, ProcessOutcome};
pub use protected::{is_protected, PROTECTED_TABLES, TRIGGERS_FIXTURE};
pub use rows::{ColumnKind, ColumnMeta, SqlValue, TableRows};
