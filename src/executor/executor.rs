//! Query executor for kvquery
//!
//! Execution flow:
//! 1. Validate projection and predicate against the schema
//! 2. Widen the projection with both key fields
//! 3. Scan, re-issuing the same request with each continuation token
//! 4. Stop when no token is returned, the page cap is hit, or the store fails
//! 5. Return every accumulated record in page order

use uuid::Uuid;

use crate::filter::{Predicate, PredicateFilter};
use crate::observability::{log_event, Event};
use crate::schema::Schema;
use crate::store::{ContinuationToken, ScanRequest, TableStore};

use super::errors::{ExecutorError, ExecutorResult};
use super::result::{Interruption, InterruptionKind, QueryResult};

/// Default upper bound on pages fetched for one query
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Query executor that drains a paginated store
pub struct QueryExecutor<'a, S: TableStore> {
    store: &'a mut S,
    schema: &'a Schema,
    max_pages: usize,
}

impl<'a, S: TableStore> QueryExecutor<'a, S> {
    /// Creates a new executor
    pub fn new(store: &'a mut S, schema: &'a Schema) -> Self {
        Self {
            store,
            schema,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Caps the number of pages fetched (at least one)
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Executes a scan and returns every matching record.
    ///
    /// Validation failures and a store failure on the first page are errors. A
    /// store failure on a later page yields the pages already fetched, marked
    /// interrupted.
    pub fn execute(
        &mut self,
        predicate: &Predicate,
        projection: Option<&[String]>,
    ) -> ExecutorResult<QueryResult> {
        let query_id = Uuid::new_v4();
        let id = query_id.to_string();

        if let Err(err) = self.validate(predicate, projection) {
            log_event(
                Event::QueryRejected,
                &[("query_id", id.as_str()), ("reason", err.message())],
            );
            return Err(err);
        }

        let projection = projection.map(|fields| self.with_key_fields(fields));
        let filter = predicate.to_string();
        log_event(
            Event::QueryBegin,
            &[("query_id", id.as_str()), ("filter", filter.as_str())],
        );

        let mut records = Vec::new();
        let mut pages_fetched = 0usize;
        let mut token: Option<ContinuationToken> = None;
        let mut interruption = None;

        loop {
            let request = ScanRequest::new(predicate)
                .with_projection(projection.as_deref())
                .starting_after(token.as_ref());

            let page = match self.store.scan(&request) {
                Ok(page) => page,
                Err(err) if err.is_validation() || pages_fetched == 0 => {
                    let kind = err.kind();
                    let err = ExecutorError::from_store(err);
                    let event = if err.is_rejection() {
                        Event::QueryRejected
                    } else {
                        Event::QueryInterrupted
                    };
                    log_event(
                        event,
                        &[
                            ("query_id", id.as_str()),
                            ("reason", err.message()),
                            ("store_error", kind),
                        ],
                    );
                    return Err(err);
                }
                Err(err) => {
                    interruption = Some(Interruption {
                        kind: InterruptionKind::StoreError,
                        reason: err.to_string(),
                        pages_fetched,
                    });
                    break;
                }
            };

            pages_fetched += 1;
            let page_no = pages_fetched.to_string();
            let page_len = page.records.len().to_string();
            log_event(
                Event::QueryPage,
                &[
                    ("query_id", id.as_str()),
                    ("page", page_no.as_str()),
                    ("records", page_len.as_str()),
                ],
            );
            records.extend(page.records);

            token = match page.continuation {
                Some(next) => Some(next),
                None => break,
            };

            if pages_fetched >= self.max_pages {
                interruption = Some(Interruption {
                    kind: InterruptionKind::PageLimit,
                    reason: format!("stopped after {} pages", pages_fetched),
                    pages_fetched,
                });
                break;
            }
        }

        let pages = pages_fetched.to_string();
        let count = records.len().to_string();
        match &interruption {
            Some(stop) => log_event(
                Event::QueryInterrupted,
                &[
                    ("query_id", id.as_str()),
                    ("pages", pages.as_str()),
                    ("records", count.as_str()),
                    ("reason", stop.reason.as_str()),
                ],
            ),
            None => log_event(
                Event::QueryComplete,
                &[
                    ("query_id", id.as_str()),
                    ("pages", pages.as_str()),
                    ("records", count.as_str()),
                ],
            ),
        }

        Ok(QueryResult::new(query_id, records, pages_fetched, interruption))
    }

    fn validate(&self, predicate: &Predicate, projection: Option<&[String]>) -> ExecutorResult<()> {
        if let Some(fields) = projection {
            self.schema.validate_fields(fields)?;
        }
        PredicateFilter::validate(predicate, self.schema)?;
        Ok(())
    }

    /// Requested fields in order, then any key field not already present
    fn with_key_fields(&self, fields: &[String]) -> Vec<String> {
        let mut widened = fields.to_vec();
        for key in self.schema.key_names() {
            if !widened.iter().any(|f| f == key) {
                widened.push(key.to_string());
            }
        }
        widened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::errors::ExecutorErrorCode;
    use crate::filter::CompareOp;
    use crate::schema::{KeyValue, Record, RecordKey, Scalar};
    use crate::store::{ScanPage, StoreError, StoreResult, TableDescription};

    /// In-memory store serving fixed pages, optionally failing on one call
    struct PagedStore {
        pages: Vec<Vec<Record>>,
        fail_on_call: Option<(usize, StoreError)>,
        calls: usize,
        projections: Vec<Option<Vec<String>>>,
    }

    impl PagedStore {
        fn new(pages: Vec<Vec<Record>>) -> Self {
            Self {
                pages,
                fail_on_call: None,
                calls: 0,
                projections: Vec::new(),
            }
        }

        fn failing_on(mut self, call: usize, err: StoreError) -> Self {
            self.fail_on_call = Some((call, err));
            self
        }
    }

    fn movie(year: i64, title: &str) -> Record {
        Record::new().with("year", year).with("title", title)
    }

    impl TableStore for PagedStore {
        fn exists(&self) -> StoreResult<bool> {
            Ok(true)
        }

        fn describe(&self) -> StoreResult<TableDescription> {
            Err(StoreError::Unavailable("not supported".into()))
        }

        fn create(&mut self) -> StoreResult<()> {
            Ok(())
        }

        fn put(&mut self, _record: Record) -> StoreResult<()> {
            Ok(())
        }

        fn scan(&mut self, request: &ScanRequest<'_>) -> StoreResult<ScanPage> {
            let call = self.calls;
            self.calls += 1;
            self.projections.push(request.projection.map(|p| p.to_vec()));

            if let Some((n, err)) = &self.fail_on_call {
                if *n == call {
                    return Err(err.clone());
                }
            }

            let index = match request.exclusive_start_key {
                Some(token) => match &token.key().sort {
                    KeyValue::Int(i) => *i as usize + 1,
                    KeyValue::Text(_) => unreachable!("test tokens are numeric"),
                },
                None => 0,
            };
            let records = self.pages.get(index).cloned().unwrap_or_default();
            let continuation = if index + 1 < self.pages.len() {
                Some(ContinuationToken::new(RecordKey {
                    partition: KeyValue::Int(0),
                    sort: KeyValue::Int(index as i64),
                }))
            } else {
                None
            };
            Ok(ScanPage {
                records,
                continuation,
            })
        }
    }

    fn three_pages() -> Vec<Vec<Record>> {
        vec![
            vec![movie(1990, "A"), movie(1991, "B")],
            vec![],
            vec![movie(1992, "C")],
        ]
    }

    #[test]
    fn test_drains_every_page() {
        let schema = Schema::movies();
        let mut store = PagedStore::new(three_pages());
        let result = QueryExecutor::new(&mut store, &schema)
            .execute(&Predicate::All, None)
            .unwrap();

        assert_eq!(result.count(), 3);
        assert_eq!(result.pages_fetched(), 3);
        assert!(result.is_complete());
        assert_eq!(store.calls, 3);
    }

    #[test]
    fn test_first_page_failure_is_error() {
        let schema = Schema::movies();
        let mut store = PagedStore::new(three_pages())
            .failing_on(0, StoreError::Unavailable("down".into()));
        let err = QueryExecutor::new(&mut store, &schema)
            .execute(&Predicate::All, None)
            .unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::KvqStoreFailed);
    }

    #[test]
    fn test_later_failure_keeps_partial_result() {
        let schema = Schema::movies();
        let mut store = PagedStore::new(three_pages())
            .failing_on(2, StoreError::Throttled("slow down".into()));
        let result = QueryExecutor::new(&mut store, &schema)
            .execute(&Predicate::All, None)
            .unwrap();

        assert_eq!(result.count(), 2);
        let stop = result.interruption().unwrap();
        assert_eq!(stop.kind, InterruptionKind::StoreError);
        assert_eq!(stop.pages_fetched, 2);
        assert!(stop.reason.contains("slow down"));
    }

    #[test]
    fn test_store_validation_mid_scan_is_error() {
        let schema = Schema::movies();
        let mut store = PagedStore::new(three_pages())
            .failing_on(1, StoreError::Validation("bad".into()));
        let err = QueryExecutor::new(&mut store, &schema)
            .execute(&Predicate::All, None)
            .unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn test_page_cap_interrupts() {
        let schema = Schema::movies();
        let mut store = PagedStore::new(three_pages());
        let result = QueryExecutor::new(&mut store, &schema)
            .with_max_pages(2)
            .execute(&Predicate::All, None)
            .unwrap();

        assert_eq!(result.pages_fetched(), 2);
        assert_eq!(
            result.interruption().unwrap().kind,
            InterruptionKind::PageLimit
        );
    }

    #[test]
    fn test_projection_gains_key_fields() {
        let schema = Schema::movies();
        let mut store = PagedStore::new(vec![vec![movie(1990, "A")]]);
        let fields = vec!["rating".to_string(), "title".to_string()];
        QueryExecutor::new(&mut store, &schema)
            .execute(&Predicate::All, Some(&fields))
            .unwrap();

        assert_eq!(
            store.projections[0],
            Some(vec!["rating".to_string(), "title".to_string(), "year".to_string()])
        );
    }

    #[test]
    fn test_invalid_request_never_reaches_store() {
        let schema = Schema::movies();
        let mut store = PagedStore::new(three_pages());

        let fields = vec!["budget".to_string()];
        let err = QueryExecutor::new(&mut store, &schema)
            .execute(&Predicate::All, Some(&fields))
            .unwrap_err();
        assert!(err.is_rejection());

        let predicate = Predicate::compare("year", CompareOp::Eq, Scalar::Text("x".into()));
        let err = QueryExecutor::new(&mut store, &schema)
            .execute(&predicate, None)
            .unwrap_err();
        assert!(err.is_rejection());

        assert_eq!(store.calls, 0);
    }
}
