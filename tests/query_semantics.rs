//! Query Semantics Tests
//!
//! End-to-end behavior of one request through the pipeline on the table backend,
//! where every stored property is a string:
//! - Clauses are conjunctive and compare by declared type
//! - Sorting is numeric for numeric fields and stable
//! - Missing display fields render as empty cells
//! - Malformed clauses are skipped, unknown fields are rejected before the store
//! - Exported CSV carries unescaped sort keys

use std::fs;

use kvquery::backend::Backend;
use kvquery::executor::SortSpec;
use kvquery::filter::{KeyConstraint, KeyRange};
use kvquery::observability::MetricsRegistry;
use kvquery::pipeline::{QueryOutcome, QueryPipeline, QueryRequest};
use kvquery::schema::{Record, Schema};
use kvquery::store::{
    LocalTable, ScanPage, ScanRequest, StoreResult, TableDescription, TableStore,
};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn schema() -> Schema {
    Backend::Table.apply(Schema::movies())
}

fn movie(year: &str, title: &str) -> Record {
    Record::new().with("year", year).with("title", title)
}

fn table(dir: &TempDir, records: Vec<Record>) -> LocalTable {
    let mut store = LocalTable::open(dir.path().join("movies.json"), schema())
        .unwrap()
        .with_page_size(3);
    store.create().unwrap();
    for record in records {
        store.put(record).unwrap();
    }
    store
}

fn run(store: &mut LocalTable, request: &QueryRequest) -> QueryOutcome {
    let schema = schema();
    let metrics = MetricsRegistry::new();
    QueryPipeline::new(store, &schema, &metrics)
        .run(request)
        .unwrap()
}

fn column(outcome: &QueryOutcome, index: usize) -> Vec<String> {
    outcome.rows.iter().map(|r| r.cells[index].clone()).collect()
}

/// Counts scans so tests can prove the store was never reached
struct CountingTable {
    inner: LocalTable,
    scans: usize,
}

impl TableStore for CountingTable {
    fn exists(&self) -> StoreResult<bool> {
        self.inner.exists()
    }

    fn describe(&self) -> StoreResult<TableDescription> {
        self.inner.describe()
    }

    fn create(&mut self) -> StoreResult<()> {
        self.inner.create()
    }

    fn put(&mut self, record: Record) -> StoreResult<()> {
        self.inner.put(record)
    }

    fn scan(&mut self, request: &ScanRequest<'_>) -> StoreResult<ScanPage> {
        self.scans += 1;
        self.inner.scan(request)
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Every clause must hold; numeric clauses compare numerically on string storage.
#[test]
fn test_clauses_are_conjunctive() {
    let dir = TempDir::new().unwrap();
    let mut store = table(
        &dir,
        vec![
            movie("1995", "Heat").with("rating", "8.0"),
            movie("1995", "Casper").with("rating", "7.0"),
            movie("2004", "Collateral").with("rating", "8.0"),
            movie("1989", "Batman").with("rating", "9.0"),
        ],
    );

    let request = QueryRequest {
        filter: "year > 1990 and year < 2000 and rating gt 7.5".into(),
        display: vec!["title".into()],
        ..QueryRequest::default()
    };
    let outcome = run(&mut store, &request);

    assert_eq!(column(&outcome, 0), vec!["Heat"]);
}

/// Exact sort key with escaped characters matches the stored form.
#[test]
fn test_exact_sort_key_is_escaped_before_matching() {
    let dir = TempDir::new().unwrap();
    let mut store = table(
        &dir,
        vec![movie("1997", "Face!fOff"), movie("1997", "Face")],
    );

    let request = QueryRequest {
        partition: KeyConstraint::Exact("1997".into()),
        sort_key: KeyConstraint::Exact("Face/Off".into()),
        display: vec!["title".into()],
        ..QueryRequest::default()
    };
    let outcome = run(&mut store, &request);

    assert_eq!(column(&outcome, 0), vec!["Face/Off"]);
}

/// Lower and upper bounds on the sort key both apply.
#[test]
fn test_sort_key_range_with_both_bounds() {
    let dir = TempDir::new().unwrap();
    let mut store = table(
        &dir,
        vec![
            movie("2000", "Alpha"),
            movie("2000", "Bravo"),
            movie("2000", "Charlie"),
            movie("2000", "Delta"),
        ],
    );

    let request = QueryRequest {
        sort_key: KeyConstraint::Range(KeyRange::between("Alpha", "Delta")),
        display: vec!["title".into()],
        ..QueryRequest::default()
    };
    let outcome = run(&mut store, &request);

    assert_eq!(column(&outcome, 0), vec!["Bravo", "Charlie"]);
}

/// A clause missing its literal is skipped; the rest still filter.
#[test]
fn test_malformed_clause_tolerated() {
    let dir = TempDir::new().unwrap();
    let mut store = table(
        &dir,
        vec![
            movie("1995", "Heat").with("rating", "8.2"),
            movie("1995", "Casper").with("rating", "6.0"),
        ],
    );

    let request = QueryRequest {
        filter: "year gt and rating ge 8".into(),
        display: vec!["title".into()],
        ..QueryRequest::default()
    };
    let outcome = run(&mut store, &request);

    assert_eq!(column(&outcome, 0), vec!["Heat"]);
    assert_eq!(outcome.skipped_clauses.len(), 1);
    assert_eq!(outcome.skipped_clauses[0].clause, "year gt");
}

/// Unknown fields in a clause, sort or projection never reach the store.
#[test]
fn test_unknown_fields_rejected_before_store() {
    let dir = TempDir::new().unwrap();
    let schema = schema();
    let metrics = MetricsRegistry::new();
    let mut store = CountingTable {
        inner: table(&dir, vec![movie("1995", "Heat")]),
        scans: 0,
    };

    let requests = [
        QueryRequest {
            filter: "budget gt 5".into(),
            ..QueryRequest::default()
        },
        QueryRequest {
            sort: Some(SortSpec::asc("budget")),
            ..QueryRequest::default()
        },
        QueryRequest {
            display: vec!["title".into(), "budget".into()],
            ..QueryRequest::default()
        },
    ];

    for request in &requests {
        let err = QueryPipeline::new(&mut store, &schema, &metrics)
            .run(request)
            .unwrap_err();
        assert!(err.is_validation(), "expected validation error, got {}", err);
    }
    assert_eq!(store.scans, 0);
    assert_eq!(metrics.snapshot().queries_rejected, 3);
}

// =============================================================================
// Sorting and Projection
// =============================================================================

/// String-stored numbers sort numerically; ties keep key order.
#[test]
fn test_numeric_sort_on_string_storage() {
    let dir = TempDir::new().unwrap();
    let mut store = table(
        &dir,
        vec![
            movie("2001", "A").with("rank", "9"),
            movie("2001", "B").with("rank", "10"),
            movie("2001", "C").with("rank", "2"),
            movie("2001", "D").with("rank", "9"),
        ],
    );

    let request = QueryRequest {
        sort: Some(SortSpec::asc("rank")),
        display: vec!["title".into(), "rank".into()],
        ..QueryRequest::default()
    };
    let outcome = run(&mut store, &request);

    assert_eq!(column(&outcome, 1), vec!["2", "9", "9", "10"]);
    assert_eq!(column(&outcome, 0), vec!["C", "A", "D", "B"]);
}

/// A display field the record lacks renders as an empty cell.
#[test]
fn test_missing_display_field_is_empty_cell() {
    let dir = TempDir::new().unwrap();
    let mut store = table(&dir, vec![movie("2010", "Inception")]);

    let request = QueryRequest {
        display: vec!["title".into(), "rating".into()],
        ..QueryRequest::default()
    };
    let outcome = run(&mut store, &request);

    assert_eq!(outcome.headers, vec!["title", "rating"]);
    assert_eq!(outcome.rows[0].cells, vec!["Inception", ""]);
}

// =============================================================================
// Export
// =============================================================================

/// Escaped sort keys are exported unescaped and quoted when they contain commas.
#[test]
fn test_export_unescapes_and_quotes() {
    let dir = TempDir::new().unwrap();
    let schema = schema();
    let metrics = MetricsRegistry::new();
    let mut store = table(
        &dir,
        vec![movie("1997", "Face!fOff, Part 2").with("rating", "7.3")],
    );
    let export_dir = dir.path().join("out");

    let request = QueryRequest {
        display: vec!["title".into(), "rating".into()],
        export: true,
        ..QueryRequest::default()
    };
    let outcome = QueryPipeline::new(&mut store, &schema, &metrics)
        .with_backend(Backend::Table)
        .with_export_dir(&export_dir)
        .run(&request)
        .unwrap();

    let path = export_dir.join("table_query_results.csv");
    assert_eq!(outcome.export_path.as_deref(), Some(path.as_path()));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "title,rating\n\"Face/Off, Part 2\",7.3\n"
    );
}
