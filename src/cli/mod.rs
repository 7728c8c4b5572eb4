//! CLI module
//!
//! - init: create the data file
//! - start: open the store and serve HTTP
//! - check: validate config and data file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, init, run, run_command, start};
pub use errors::{CliError, CliErrorCode, CliResult};
