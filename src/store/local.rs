//! File-backed table
//!
//! Items live in memory in key order and are persisted as one JSON document.
//! A page evaluates at most `page_size` items in key order, so a page can hold
//! fewer matches than its size, or none, and still carry a continuation token.

use std::collections::BTreeMap;
use std::fs;
use std::ops::Bound;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use super::table::{ContinuationToken, ScanPage, ScanRequest, TableDescription, TableStore};
use crate::filter::PredicateFilter;
use crate::schema::{Record, RecordKey, Schema};

/// Default number of items evaluated per scan page
pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Serialize, Deserialize)]
struct TableFile {
    table_name: String,
    items: Vec<Record>,
}

/// A table persisted to a single JSON file
#[derive(Debug)]
pub struct LocalTable {
    schema: Schema,
    path: PathBuf,
    page_size: usize,
    /// `None` until the table is created
    items: Option<BTreeMap<RecordKey, Record>>,
}

impl LocalTable {
    /// Opens the table at `path`, loading it if the file exists
    pub fn open(path: impl Into<PathBuf>, schema: Schema) -> StoreResult<Self> {
        let path = path.into();
        let items = if path.exists() {
            Some(Self::load(&path, &schema)?)
        } else {
            None
        };

        Ok(Self {
            schema,
            path,
            page_size: DEFAULT_PAGE_SIZE,
            items,
        })
    }

    /// Sets the number of items evaluated per page (at least one)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of stored items, zero if the table does not exist
    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(path: &Path, schema: &Schema) -> StoreResult<BTreeMap<RecordKey, Record>> {
        let content = fs::read_to_string(path)?;
        let file: TableFile = serde_json::from_str(&content)?;
        if file.table_name != schema.table_name {
            return Err(StoreError::Corrupt(format!(
                "{} holds table '{}', expected '{}'",
                path.display(),
                file.table_name,
                schema.table_name
            )));
        }

        let mut items = BTreeMap::new();
        for record in file.items {
            let key = record
                .key(schema)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?;
            items.insert(key, record);
        }
        Ok(items)
    }

    fn items(&self) -> StoreResult<&BTreeMap<RecordKey, Record>> {
        self.items
            .as_ref()
            .ok_or_else(|| StoreError::TableNotFound(self.schema.table_name.clone()))
    }

    fn items_mut(&mut self) -> StoreResult<&mut BTreeMap<RecordKey, Record>> {
        let name = &self.schema.table_name;
        self.items
            .as_mut()
            .ok_or_else(|| StoreError::TableNotFound(name.clone()))
    }

    fn write(&self) -> StoreResult<()> {
        let items = self.items()?;
        let file = TableFile {
            table_name: self.schema.table_name.clone(),
            items: items.values().cloned().collect(),
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content =
            serde_json::to_string_pretty(&file).map_err(|e| StoreError::Io(e.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl TableStore for LocalTable {
    fn exists(&self) -> StoreResult<bool> {
        Ok(self.items.is_some())
    }

    fn describe(&self) -> StoreResult<TableDescription> {
        let items = self.items()?;
        Ok(TableDescription {
            table_name: self.schema.table_name.clone(),
            partition_key: self.schema.partition_key.clone(),
            sort_key: self.schema.sort_key.clone(),
            item_count: items.len(),
            page_size: self.page_size,
        })
    }

    fn create(&mut self) -> StoreResult<()> {
        if self.items.is_some() {
            return Err(StoreError::TableExists(self.schema.table_name.clone()));
        }
        self.items = Some(BTreeMap::new());
        self.write()
    }

    fn put(&mut self, record: Record) -> StoreResult<()> {
        let key = record.key(&self.schema)?;
        self.items_mut()?.insert(key, record);
        Ok(())
    }

    fn flush(&mut self) -> StoreResult<()> {
        self.write()
    }

    fn scan(&mut self, request: &ScanRequest<'_>) -> StoreResult<ScanPage> {
        PredicateFilter::validate(request.predicate, &self.schema)?;
        if let Some(fields) = request.projection {
            self.schema.validate_fields(fields)?;
        }

        let items = self.items()?;
        let lower = match request.exclusive_start_key {
            Some(token) => Bound::Excluded(token.key()),
            None => Bound::Unbounded,
        };

        let mut records = Vec::new();
        let mut last_evaluated: Option<&RecordKey> = None;
        let mut has_more = false;

        let range = (lower, Bound::Unbounded);
        for (evaluated, (key, record)) in items.range::<RecordKey, _>(range).enumerate() {
            if evaluated >= self.page_size {
                has_more = true;
                break;
            }
            last_evaluated = Some(key);

            if PredicateFilter::matches(record, request.predicate, &self.schema) {
                records.push(match request.projection {
                    Some(fields) => record.project(fields),
                    None => record.clone(),
                });
            }
        }

        let continuation = if has_more {
            last_evaluated.map(|k| ContinuationToken::new(k.clone()))
        } else {
            None
        };

        Ok(ScanPage {
            records,
            continuation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{CompareOp, Predicate};
    use crate::schema::Scalar;
    use tempfile::TempDir;

    fn movie(year: i64, title: &str) -> Record {
        Record::new().with("year", year).with("title", title)
    }

    fn table(dir: &TempDir, page_size: usize) -> LocalTable {
        let mut table = LocalTable::open(dir.path().join("movies.json"), Schema::movies())
            .unwrap()
            .with_page_size(page_size);
        table.create().unwrap();
        for (i, title) in ["A", "B", "C", "D", "E"].iter().enumerate() {
            table
                .put(movie(1990 + i as i64, *title).with("rank", i as i64))
                .unwrap();
        }
        table.flush().unwrap();
        table
    }

    #[test]
    fn test_missing_table_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let table = LocalTable::open(dir.path().join("none.json"), Schema::movies()).unwrap();
        assert!(!table.exists().unwrap());
        assert!(matches!(
            table.describe(),
            Err(StoreError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        let mut t = table(&dir, 10);
        assert!(matches!(t.create(), Err(StoreError::TableExists(_))));
    }

    #[test]
    fn test_reopen_loads_items() {
        let dir = TempDir::new().unwrap();
        let t = table(&dir, 10);
        let reopened = LocalTable::open(t.path(), Schema::movies()).unwrap();
        assert_eq!(reopened.len(), 5);
        assert_eq!(reopened.describe().unwrap().item_count, 5);
    }

    #[test]
    fn test_scan_pages_until_exhausted() {
        let dir = TempDir::new().unwrap();
        let mut t = table(&dir, 2);
        let predicate = Predicate::All;

        let first = t.scan(&ScanRequest::new(&predicate)).unwrap();
        assert_eq!(first.records.len(), 2);
        let token = first.continuation.clone().unwrap();

        let second = t
            .scan(&ScanRequest::new(&predicate).starting_after(Some(&token)))
            .unwrap();
        assert_eq!(second.records.len(), 2);
        let token = second.continuation.clone().unwrap();

        let third = t
            .scan(&ScanRequest::new(&predicate).starting_after(Some(&token)))
            .unwrap();
        assert_eq!(third.records.len(), 1);
        assert!(third.continuation.is_none());
    }

    #[test]
    fn test_page_can_be_empty_with_token() {
        let dir = TempDir::new().unwrap();
        let mut t = table(&dir, 2);
        let predicate = Predicate::compare("year", CompareOp::Eq, Scalar::Int(1994));

        let first = t.scan(&ScanRequest::new(&predicate)).unwrap();
        assert!(first.records.is_empty());
        assert!(first.continuation.is_some());
    }

    #[test]
    fn test_exact_page_boundary_has_no_token() {
        let dir = TempDir::new().unwrap();
        let mut t = table(&dir, 5);
        let page = t.scan(&ScanRequest::new(&Predicate::All)).unwrap();
        assert_eq!(page.records.len(), 5);
        assert!(page.continuation.is_none());
    }

    #[test]
    fn test_projection_limits_fields() {
        let dir = TempDir::new().unwrap();
        let mut t = table(&dir, 10);
        let fields = vec!["title".to_string()];
        let page = t
            .scan(&ScanRequest::new(&Predicate::All).with_projection(Some(&fields)))
            .unwrap();
        assert_eq!(page.records[0].len(), 1);
    }

    #[test]
    fn test_scan_rejects_unknown_projection_field() {
        let dir = TempDir::new().unwrap();
        let mut t = table(&dir, 10);
        let fields = vec!["budget".to_string()];
        let err = t
            .scan(&ScanRequest::new(&Predicate::All).with_projection(Some(&fields)))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_scan_rejects_mistyped_predicate() {
        let dir = TempDir::new().unwrap();
        let mut t = table(&dir, 10);
        let predicate = Predicate::compare("year", CompareOp::Gt, Scalar::Text("x".into()));
        assert!(t.scan(&ScanRequest::new(&predicate)).unwrap_err().is_validation());
    }

    #[test]
    fn test_put_without_key_is_validation_error() {
        let dir = TempDir::new().unwrap();
        let mut t = table(&dir, 10);
        let err = t.put(Record::new().with("title", "No Year")).unwrap_err();
        assert!(err.is_validation());
    }
}
