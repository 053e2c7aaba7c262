//! CLI module for kvquery
//!
//! Provides command-line interface for:
//! - init: Create the table and load the movie data set
//! - describe: Print table metadata
//! - query: Interactive prompt session
//! - run: One-shot JSON query from stdin

mod args;
mod commands;
mod config;
mod errors;
mod io;
mod prompt;
mod session;

pub use args::{Cli, Command};
pub use commands::{describe, init, query, run, run_command, run_once};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
pub use prompt::{ConstraintMode, KeyFilterMode, Prompter, RangeMode, SortChoice, YesNo};
pub use session::run_session;
