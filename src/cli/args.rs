// file: src/cli/args.rs
// version: 1.0.0
// guid: 0e5a8b3d-6f2c-4917-a4d8-3b1e9c7f0a62

//! Command line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xitool")]
#[command(about = "Manage the database.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backup full database, will be performed before other commands
    #[arg(short, long)]
    pub backup: bool,

    /// Backup only protected tables, will be performed before other commands
    #[arg(short, long)]
    pub lite: bool,

    /// Server checkout containing settings/, sql/ and tools/
    #[arg(long, global = true, env = "XITOOL_ROOT", default_value = ".")]
    pub root: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check and perform database update
    #[command(alias = "u")]
    Update {
        /// Force update all tables
        #[arg(short, long)]
        all: bool,
    },

    /// Import a .sql file to the database
    #[command(alias = "i")]
    Import {
        /// File to import
        import_file: PathBuf,

        /// Confirm import (required)
        #[arg(long)]
        yes: bool,
    },

    /// Export the values from a table in the database to its .sql file
    #[command(alias = "e")]
    Export {
        /// Table to export
        table_name: Option<String>,

        /// Export all tables
        #[arg(short, long)]
        all: bool,
    },

    /// Create a fresh database
    Setup {
        /// Database to create (must match network.lua)
        database_name: String,

        /// Confirm setup (required)
        #[arg(long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        let cli = Cli::try_parse_from(["xitool", "u", "--all"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Update { all: true }));

        let cli = Cli::try_parse_from(["xitool", "e", "npc_list"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Export {
                table_name: Some("npc_list".to_string()),
                all: false
            })
        );
    }

    #[test]
    fn test_parse_backup_flags_without_command() {
        let cli = Cli::try_parse_from(["xitool", "-l"]).unwrap();
        assert!(cli.lite);
        assert!(!cli.backup);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_setup_requires_name() {
        assert!(Cli::try_parse_from(["xitool", "setup", "--yes"]).is_err());

        let cli = Cli::try_parse_from(["xitool", "setup", "xidb", "--yes"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Setup {
                database_name: "xidb".to_string(),
                yes: true
            })
        );
    }
}
