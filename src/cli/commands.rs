//! CLI command implementations
//!
//! Every command follows the same boot order:
//! 1. Configuration load and validation
//! 2. Log level
//! 3. Schema load, adjusted to the backend
//! 4. Table open
//!
//! then does its own work.

use std::io;
use std::path::Path;

use serde_json::json;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};
use super::prompt::Prompter;
use super::session::run_session;
use crate::ingest::{ensure_table, MovieLoader};
use crate::observability::{log_event, Event, Logger, MetricsRegistry};
use crate::pipeline::{QueryPipeline, QueryRequest};
use crate::schema::Schema;
use crate::store::{LocalTable, TableStore};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Describe { config } => describe(&config),
        Command::Query { config } => query(&config),
        Command::Run { config } => run_once(&config),
    }
}

/// Loaded configuration, schema and table
struct Booted {
    config: Config,
    schema: Schema,
    store: LocalTable,
}

fn boot(config_path: &Path) -> CliResult<Booted> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);
    log_event(
        Event::ConfigLoaded,
        &[
            ("backend", config.backend.as_str()),
            ("data_dir", config.data_dir.as_str()),
        ],
    );

    let schema = config.schema()?;
    let store = LocalTable::open(config.table_path(&schema), schema.clone())?
        .with_page_size(config.page_size);

    Ok(Booted {
        config,
        schema,
        store,
    })
}

/// Boots and fails unless the table already exists
fn boot_existing(config_path: &Path) -> CliResult<Booted> {
    let booted = boot(config_path)?;
    if !booted.store.exists()? {
        return Err(CliError::table_missing(&booted.schema.table_name));
    }
    Ok(booted)
}

/// Create and populate the table
///
/// An existing table is left untouched; only a newly created table is loaded.
pub fn init(config_path: &Path) -> CliResult<()> {
    let Booted {
        config,
        schema,
        mut store,
    } = boot(config_path)?;

    let created = ensure_table(&mut store, &schema.table_name)?;
    let report = if created {
        let entries = MovieLoader::read(config.movie_data_path())?;
        Some(MovieLoader::new(&schema, config.backend).populate(&mut store, &entries)?)
    } else {
        None
    };

    write_response(json!({
        "table": schema.table_name,
        "backend": config.backend,
        "created": created,
        "report": report,
        "path": store.path().display().to_string(),
    }))
}

/// Print the table description
pub fn describe(config_path: &Path) -> CliResult<()> {
    let booted = boot_existing(config_path)?;
    let description = booted.store.describe()?;
    write_response(serde_json::to_value(description)?)
}

/// Interactive session on stdin/stdout
pub fn query(config_path: &Path) -> CliResult<()> {
    let Booted {
        config,
        schema,
        mut store,
    } = boot_existing(config_path)?;

    let metrics = MetricsRegistry::new();
    let mut pipeline = QueryPipeline::new(&mut store, &schema, &metrics)
        .with_backend(config.backend)
        .with_export_dir(config.export_path())
        .with_max_pages(config.max_pages);

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let answered = run_session(&mut pipeline, &schema, &mut prompter)?;

    let snapshot = metrics.snapshot();
    prompter.say(serde_json::to_string_pretty(&snapshot)?)?;

    let answered = answered.to_string();
    let rejected = snapshot.queries_rejected.to_string();
    log_event(
        Event::SessionEnd,
        &[
            ("queries", answered.as_str()),
            ("rejected", rejected.as_str()),
        ],
    );
    Ok(())
}

/// One JSON request from stdin, one JSON response on stdout
pub fn run_once(config_path: &Path) -> CliResult<()> {
    let Booted {
        config,
        schema,
        mut store,
    } = boot_existing(config_path)?;

    let request: QueryRequest = read_request()?;

    let metrics = MetricsRegistry::new();
    let outcome = QueryPipeline::new(&mut store, &schema, &metrics)
        .with_backend(config.backend)
        .with_export_dir(config.export_path())
        .with_max_pages(config.max_pages)
        .run(&request);

    match outcome {
        Ok(outcome) => write_response(serde_json::to_value(&outcome)?),
        Err(e) => {
            write_error(e.code(), &e.to_string())?;
            Err(e.into())
        }
    }
}
