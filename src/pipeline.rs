//! Query pipeline
//!
//! One request flows through a fixed order:
//! Validate → Filter → Execute → Sort → Project → Export
//!
//! Display and sort fields are checked before the filter is built, so nothing
//! reaches the store for a request naming an undeclared field.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::Backend;
use crate::executor::{
    ExecutorError, Interruption, QueryExecutor, ResultSorter, SortSpec, DEFAULT_MAX_PAGES,
};
use crate::filter::{FilterBuilder, FilterError, KeyConstraint, SkippedClause};
use crate::format::{CsvExporter, ExportRow, FormatResult, Projector, TableView};
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::schema::{Schema, SchemaError};
use crate::store::TableStore;

/// Everything one query needs, as collected by the prompts or read from JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Constraint on the partition key
    #[serde(default)]
    pub partition: KeyConstraint,
    /// Constraint on the sort key
    #[serde(default)]
    pub sort_key: KeyConstraint,
    /// Free-form `field op literal [and ...]` expression
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    /// Display fields in column order; empty selects every field
    #[serde(default)]
    pub display: Vec<String>,
    #[serde(default)]
    pub export: bool,
}

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub query_id: Uuid,
    pub count: usize,
    pub pages_fetched: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interruption: Option<Interruption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_clauses: Vec<SkippedClause>,
    pub headers: Vec<String>,
    pub rows: Vec<ExportRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<PathBuf>,
    /// Set when the export was requested but could not be written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_error: Option<String>,
    #[serde(skip)]
    pub view: TableView,
}

/// Pipeline failures, by stage
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Filter(#[from] FilterError),

    #[error("{0}")]
    Executor(#[from] ExecutorError),
}

impl PipelineError {
    /// True when the request itself was invalid and could be corrected by the user
    pub fn is_validation(&self) -> bool {
        match self {
            PipelineError::Schema(_) | PipelineError::Filter(_) => true,
            PipelineError::Executor(e) => e.is_rejection(),
        }
    }

    /// Error code string of the failing stage
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Schema(e) => e.code().code(),
            PipelineError::Filter(e) => e.code().code(),
            PipelineError::Executor(e) => e.code().code(),
        }
    }
}

/// Result type for pipeline runs
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Runs requests against one store
pub struct QueryPipeline<'a, S: TableStore> {
    store: &'a mut S,
    schema: &'a Schema,
    metrics: &'a MetricsRegistry,
    backend: Backend,
    export_dir: PathBuf,
    max_pages: usize,
}

impl<'a, S: TableStore> QueryPipeline<'a, S> {
    pub fn new(store: &'a mut S, schema: &'a Schema, metrics: &'a MetricsRegistry) -> Self {
        Self {
            store,
            schema,
            metrics,
            backend: Backend::default(),
            export_dir: PathBuf::from("."),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Where exports for this backend are written
    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(self.backend.export_file_name())
    }

    /// Runs one request end to end
    pub fn run(&mut self, request: &QueryRequest) -> PipelineResult<QueryOutcome> {
        let outcome = self.run_stages(request);
        if let Err(err) = &outcome {
            if err.is_validation() {
                self.metrics.increment_queries_rejected();
            }
        }
        outcome
    }

    fn run_stages(&mut self, request: &QueryRequest) -> PipelineResult<QueryOutcome> {
        // Validate
        let projector = Projector::new(self.schema, &request.display)?;
        if let Some(spec) = &request.sort {
            self.schema.field(&spec.field)?;
        }

        // Filter
        let built = FilterBuilder::new(self.schema).build(
            &request.filter,
            &request.partition,
            &request.sort_key,
        )?;
        self.metrics.add_clauses_skipped(built.skipped.len() as u64);

        // Execute
        let projection = self.projection(projector.fields(), request.sort.as_ref());
        let result = QueryExecutor::new(&mut *self.store, self.schema)
            .with_max_pages(self.max_pages)
            .execute(&built.predicate, Some(&projection))?;

        self.metrics.increment_queries_executed();
        self.metrics.add_pages(result.pages_fetched() as u64);
        self.metrics.add_records(result.count() as u64);
        if !result.is_complete() {
            self.metrics.increment_queries_interrupted();
        }

        let query_id = result.query_id();
        let pages_fetched = result.pages_fetched();
        let interruption = result.interruption().cloned();

        // Sort
        let mut records = result.into_records();
        if let Some(spec) = &request.sort {
            ResultSorter::sort(&mut records, spec, self.schema)?;
        }

        // Project
        let (view, rows) = projector.format(&records);
        let headers = projector.fields().to_vec();

        // Export
        let (export_path, export_error) = if request.export {
            let path = self.export_path();
            match self.export(&path, &headers, &rows, query_id) {
                Ok(()) => (Some(path), None),
                Err(e) => (None, Some(e.to_string())),
            }
        } else {
            (None, None)
        };

        Ok(QueryOutcome {
            query_id,
            count: rows.len(),
            pages_fetched,
            interruption,
            skipped_clauses: built.skipped,
            headers,
            rows,
            export_path,
            export_error,
            view,
        })
    }

    /// Display fields plus the sort field, each once
    fn projection(&self, display: &[String], sort: Option<&SortSpec>) -> Vec<String> {
        let mut fields = display.to_vec();
        if let Some(spec) = sort {
            if !fields.contains(&spec.field) {
                fields.push(spec.field.clone());
            }
        }
        fields
    }

    fn export(
        &self,
        path: &Path,
        headers: &[String],
        rows: &[ExportRow],
        query_id: Uuid,
    ) -> FormatResult<()> {
        let id = query_id.to_string();
        let file = path.display().to_string();

        let written = match CsvExporter::export_to_file(path, headers, rows) {
            Ok(n) => n,
            Err(e) => {
                let reason = e.to_string();
                log_event(
                    Event::ExportFailed,
                    &[
                        ("query_id", id.as_str()),
                        ("path", file.as_str()),
                        ("reason", reason.as_str()),
                    ],
                );
                return Err(e);
            }
        };
        self.metrics.increment_exports();

        let count = written.to_string();
        log_event(
            Event::ExportWritten,
            &[
                ("query_id", id.as_str()),
                ("path", file.as_str()),
                ("rows", count.as_str()),
            ],
        );
        Ok(())
    }
}
