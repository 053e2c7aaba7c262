//! Interactive query session
//!
//! Prompts, runs, prints, repeats until the user quits. Query failures are printed
//! and the session goes on; only I/O failures on the session streams end it early.

use std::io::{BufRead, Write};

use super::errors::CliResult;
use super::prompt::Prompter;
use crate::pipeline::{QueryOutcome, QueryPipeline};
use crate::schema::Schema;
use crate::store::TableStore;

/// Runs prompts against the pipeline until quit. Returns the number of queries
/// that produced a result.
pub fn run_session<S, R, W>(
    pipeline: &mut QueryPipeline<'_, S>,
    schema: &Schema,
    prompter: &mut Prompter<R, W>,
) -> CliResult<usize>
where
    S: TableStore,
    R: BufRead,
    W: Write,
{
    let mut answered = 0;

    while let Some(request) = prompter.collect_request(schema)? {
        match pipeline.run(&request) {
            Ok(outcome) => {
                answered += 1;
                print_outcome(prompter, &outcome)?;
            }
            Err(e) if e.is_validation() => prompter.say(format!("Invalid query: {}", e))?,
            Err(e) => prompter.say(format!("Query failed: {}", e))?,
        }
    }

    Ok(answered)
}

fn print_outcome<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    outcome: &QueryOutcome,
) -> CliResult<()> {
    for skipped in &outcome.skipped_clauses {
        prompter.say(format!(
            "Skipped clause '{}': {}",
            skipped.clause, skipped.reason
        ))?;
    }

    prompter.say(outcome.view.render())?;

    if let Some(interruption) = &outcome.interruption {
        prompter.say(format!(
            "Results incomplete after {} page(s): {}",
            interruption.pages_fetched, interruption.reason
        ))?;
    }
    if let Some(path) = &outcome.export_path {
        prompter.say(format!(
            "Exported {} record(s) to {}",
            outcome.count,
            path.display()
        ))?;
    }
    if let Some(reason) = &outcome.export_error {
        prompter.say(format!("Export failed: {}", reason))?;
    }
    Ok(())
}
