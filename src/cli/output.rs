// file: src/cli/output.rs
// version: 1.0.0
// guid: 4f7e2c18-9a3b-4d60-b8e1-5c0d7a2f9e34

//! Coloured user-facing output

use colored::Colorize;

pub fn print_red(msg: &str) {
    println!("{}", msg.red());
}

pub fn print_green(msg: &str) {
    println!("{}", msg.green());
}

/// Print a heading followed by every error line in red
pub fn print_errors(heading: &str, errors: &[String]) {
    println!("{}", heading);
    for error in errors {
        print_red(error);
    }
}
