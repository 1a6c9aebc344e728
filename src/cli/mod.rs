// file: src/cli/mod.rs
// version: 1.0.0
// guid: 9c1e4a7b-3d58-4f02-b6e9-7a2d0c5f8e13

//! Command line interface for xitool

pub mod args;
pub mod commands;
pub mod output;

pub use args::{Cli, Commands};
pub use commands::{run, validate_command, Context};
