// file: src/utils/mod.rs
// version: 1.0.0
// guid: c6a3e9f1-0b7d-4e28-8f45-1d9b2a7e6c03

//! Utility modules for system operations

pub mod system;

pub use system::SystemUtils;
