//! Data set loader
//!
//! Reads a JSON array of entries shaped like
//! `{"year": 2013, "title": "Rush", "info": {"rating": 8.3, "genres": ["Action"]}}`
//! and writes one record per entry. Info attributes are looked up in the nested
//! `info` object first, then at the top level; attributes the schema does not
//! declare are dropped.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{IngestError, IngestResult};
use crate::backend::Backend;
use crate::observability::{log_event, Event};
use crate::schema::{escape_key, Record, Schema};
use crate::store::TableStore;

/// Outcome of a population run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IngestReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Converts source entries into records for one backend
pub struct MovieLoader<'a> {
    schema: &'a Schema,
    backend: Backend,
}

impl<'a> MovieLoader<'a> {
    pub fn new(schema: &'a Schema, backend: Backend) -> Self {
        Self { schema, backend }
    }

    /// Reads the source file
    pub fn read(path: &Path) -> IngestResult<Vec<Map<String, Value>>> {
        let content = fs::read_to_string(path).map_err(|source| IngestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Builds the stored record for one entry. Returns `None` when a key field is
    /// missing.
    pub fn to_record(&self, entry: &Map<String, Value>) -> Option<Record> {
        let info = entry.get("info").and_then(Value::as_object);
        let mut record = Record::new();

        let pk = &self.schema.partition_key.name;
        let partition = entry.get(pk).filter(|v| !v.is_null())?;
        record.insert(pk.as_str(), self.encode(partition)?);

        let sk = &self.schema.sort_key.name;
        let sort = self.encode(entry.get(sk).filter(|v| !v.is_null())?)?;
        let sort = match sort {
            Value::String(s) if self.schema.escape_sort_key => Value::String(escape_key(&s)),
            other => other,
        };
        record.insert(sk.as_str(), sort);

        for def in &self.schema.info_fields {
            let value = info
                .and_then(|i| i.get(&def.name))
                .or_else(|| entry.get(&def.name));
            if let Some(encoded) = value.and_then(|v| self.encode(v)) {
                record.insert(def.name.as_str(), encoded);
            }
        }

        Some(record)
    }

    /// Writes every entry to the store, then flushes. Entries without keys, or that
    /// the store refuses as invalid, are counted as skipped.
    pub fn populate<S: TableStore>(
        &self,
        store: &mut S,
        entries: &[Map<String, Value>],
    ) -> IngestResult<IngestReport> {
        let mut report = IngestReport::default();

        for entry in entries {
            let record = match self.to_record(entry) {
                Some(r) => r,
                None => {
                    report.skipped += 1;
                    continue;
                }
            };
            match store.put(record) {
                Ok(()) => report.loaded += 1,
                Err(e) if e.is_validation() => report.skipped += 1,
                Err(e) => return Err(e.into()),
            }
        }
        store.flush()?;

        let loaded = report.loaded.to_string();
        let skipped = report.skipped.to_string();
        log_event(
            Event::TablePopulated,
            &[
                ("table", self.schema.table_name.as_str()),
                ("loaded", loaded.as_str()),
                ("skipped", skipped.as_str()),
            ],
        );
        Ok(report)
    }

    /// Encodes one source value for this backend. Lists become comma-joined text.
    fn encode(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Null => None,
            Value::Array(items) => Some(Value::String(join_list(items))),
            Value::String(_) => Some(value.clone()),
            other if self.backend.stringifies_values() => Some(Value::String(other.to_string())),
            other => Some(other.clone()),
        }
    }
}

fn join_list(items: &[Value]) -> String {
    items
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Creates the table unless it already exists. Returns true if it was created.
pub fn ensure_table<S: TableStore>(store: &mut S, table_name: &str) -> IngestResult<bool> {
    if store.exists()? {
        log_event(Event::TableExists, &[("table", table_name)]);
        return Ok(false);
    }
    store.create()?;
    log_event(Event::TableCreated, &[("table", table_name)]);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalTable;
    use serde_json::json;
    use tempfile::TempDir;

    fn entry(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn face_off() -> Map<String, Value> {
        entry(json!({
            "year": 1997,
            "title": "Face/Off",
            "info": {
                "directors": ["John Woo"],
                "actors": ["John Travolta", "Nicolas Cage"],
                "rating": 7.3,
                "rank": 1200,
                "budget": 80000000
            }
        }))
    }

    #[test]
    fn test_document_keeps_native_types() {
        let schema = Backend::Document.apply(Schema::movies());
        let record = MovieLoader::new(&schema, Backend::Document)
            .to_record(&face_off())
            .unwrap();

        assert_eq!(record.field(&schema, "year").unwrap(), Some(&json!(1997)));
        assert_eq!(
            record.field(&schema, "title").unwrap(),
            Some(&json!("Face/Off"))
        );
        assert_eq!(record.field(&schema, "rating").unwrap(), Some(&json!(7.3)));
        assert_eq!(
            record.field(&schema, "actors").unwrap(),
            Some(&json!("John Travolta, Nicolas Cage"))
        );
    }

    #[test]
    fn test_table_stringifies_and_escapes() {
        let schema = Backend::Table.apply(Schema::movies());
        let record = MovieLoader::new(&schema, Backend::Table)
            .to_record(&face_off())
            .unwrap();

        assert_eq!(record.field(&schema, "year").unwrap(), Some(&json!("1997")));
        assert_eq!(
            record.field(&schema, "title").unwrap(),
            Some(&json!("Face!fOff"))
        );
        assert_eq!(record.field(&schema, "rank").unwrap(), Some(&json!("1200")));
        assert_eq!(
            record.field(&schema, "directors").unwrap(),
            Some(&json!("John Woo"))
        );
    }

    #[test]
    fn test_undeclared_attributes_dropped() {
        let schema = Schema::movies();
        let record = MovieLoader::new(&schema, Backend::Document)
            .to_record(&face_off())
            .unwrap();
        assert!(record.iter().all(|(k, _)| k != "budget"));
    }

    #[test]
    fn test_missing_key_skips_entry() {
        let schema = Schema::movies();
        let loader = MovieLoader::new(&schema, Backend::Document);
        assert!(loader.to_record(&entry(json!({"title": "No Year"}))).is_none());
    }

    #[test]
    fn test_populate_counts_and_persists() {
        let dir = TempDir::new().unwrap();
        let schema = Backend::Table.apply(Schema::movies());
        let mut store = LocalTable::open(dir.path().join("t.json"), schema.clone()).unwrap();

        assert!(ensure_table(&mut store, &schema.table_name).unwrap());
        assert!(!ensure_table(&mut store, &schema.table_name).unwrap());

        let entries = vec![
            face_off(),
            entry(json!({"year": 1995, "title": "Heat"})),
            entry(json!({"title": "Untitled"})),
        ];
        let report = MovieLoader::new(&schema, Backend::Table)
            .populate(&mut store, &entries)
            .unwrap();

        assert_eq!(report, IngestReport { loaded: 2, skipped: 1 });
        let reopened = LocalTable::open(dir.path().join("t.json"), schema).unwrap();
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = MovieLoader::read(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, IngestError::Read { .. }));
    }
}
