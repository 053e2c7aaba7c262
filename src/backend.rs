//! Backend variants
//!
//! The same engine serves two storage flavours:
//! - `document`: values keep their JSON types, keys are stored as written
//! - `table`: every property is a string and the sort key is escaped

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldType, Schema};

/// Storage flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Document,
    #[default]
    Table,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Document => "document",
            Backend::Table => "table",
        }
    }

    /// Sort keys are stored escaped
    pub fn escapes_sort_key(&self) -> bool {
        matches!(self, Backend::Table)
    }

    /// Every property is stored as a string
    pub fn stringifies_values(&self) -> bool {
        matches!(self, Backend::Table)
    }

    /// Fixed export file name
    pub fn export_file_name(&self) -> &'static str {
        match self {
            Backend::Document => "document_query_results.csv",
            Backend::Table => "table_query_results.csv",
        }
    }

    /// File holding a table's items under the data directory
    pub fn table_file_name(&self, table_name: &str) -> String {
        format!("{}_{}.json", table_name, self.as_str())
    }

    /// Adjusts a schema to this backend's key encoding. Only string sort keys
    /// are escaped.
    pub fn apply(&self, schema: Schema) -> Schema {
        let escaped = self.escapes_sort_key() && schema.sort_key.field_type == FieldType::String;
        schema.with_escaped_sort_key(escaped)
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(Backend::Document),
            "table" => Ok(Backend::Table),
            other => Err(format!(
                "unknown backend '{}', expected 'document' or 'table'",
                other
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_names() {
        assert_eq!(
            Backend::Document.export_file_name(),
            "document_query_results.csv"
        );
        assert_eq!(Backend::Table.export_file_name(), "table_query_results.csv");
    }

    #[test]
    fn test_apply_sets_escaping() {
        assert!(Backend::Table.apply(Schema::movies()).escape_sort_key);
        assert!(!Backend::Document.apply(Schema::movies()).escape_sort_key);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Document".parse::<Backend>().unwrap(), Backend::Document);
        assert!("sql".parse::<Backend>().is_err());
        let b: Backend = serde_json::from_str("\"table\"").unwrap();
        assert_eq!(b, Backend::Table);
    }

    #[test]
    fn test_table_file_name() {
        assert_eq!(
            Backend::Document.table_file_name("MoviesInfo"),
            "MoviesInfo_document.json"
        );
    }
}
