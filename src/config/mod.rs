// file: src/config/mod.rs
// version: 1.0.0
// guid: 7e3b0c48-1d5f-4a29-9b76-e2c8f4a0d153

//! Configuration module
//!
//! Handles the flat server settings files and the tool's own persisted state.

pub mod settings;
pub mod state;

pub use settings::{NetworkSettings, Settings};
pub use state::{state_path, ConfigState};
