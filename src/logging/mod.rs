// file: src/logging/mod.rs
// version: 1.0.0
// guid: 5d7a1e93-2b4c-4f08-8c6d-9e0a3b1f2c58

//! Logging system for the database tool

pub mod logger;

pub use logger::{init_logger, with_async_operation_span, with_operation_span};
