// file: src/lib.rs
// version: 1.0.0
// guid: 5a0f7d2e-8b41-4c96-9e3a-d17b6f2c0a84

//! # xitool
//!
//! Database administration for a game server checkout: create a fresh database
//! from the SQL fixtures, apply changed fixtures and migrations, import single
//! files, export table contents back into their fixtures and take backups.

pub mod backup;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod logging;
pub mod update;
pub mod utils;

pub use error::{Result, XiToolError};
