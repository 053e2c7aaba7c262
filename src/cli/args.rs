//! CLI argument definitions using clap
//!
//! Commands:
//! - kvquery init --config <path>
//! - kvquery describe --config <path>
//! - kvquery query --config <path>
//! - kvquery run --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kvquery - attribute-filter queries over a key-value table
#[derive(Parser, Debug)]
#[command(name = "kvquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the table if absent and load the movie data set
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./kvquery.json")]
        config: PathBuf,
    },

    /// Print the table description
    Describe {
        /// Path to configuration file
        #[arg(long, default_value = "./kvquery.json")]
        config: PathBuf,
    },

    /// Start an interactive query session
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./kvquery.json")]
        config: PathBuf,
    },

    /// Execute one JSON query request from stdin and exit
    Run {
        /// Path to configuration file
        #[arg(long, default_value = "./kvquery.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
