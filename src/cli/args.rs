//! CLI argument definitions using clap
//!
//! Commands:
//! - itemsvc init --config <path>
//! - itemsvc start --config <path> [--port <port>]
//! - itemsvc check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// itemsvc - CRUD item service with order-aware paging
#[derive(Parser, Debug)]
#[command(name = "itemsvc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty data file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./itemsvc.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./itemsvc.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate configuration and data file, then exit
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./itemsvc.json")]
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_with_port() {
        let cli = Cli::try_parse_from(["itemsvc", "start", "--config", "c.json", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Start { config, port } => {
                assert_eq!(config, PathBuf::from("c.json"));
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["itemsvc", "check"]).unwrap();
        assert!(matches!(cli.command, Command::Check { config } if config == PathBuf::from("./itemsvc.json")));
    }
}
