//! Record projection for display and export
//!
//! Narrows each record to the display fields, in display order, rendered as text.

use serde::Serialize;
use serde_json::Value;

use super::table_view::TableView;
use crate::schema::{unescape_key, FieldType, Record, Scalar, Schema, SchemaResult};

/// A record narrowed to the display fields, one cell per field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExportRow {
    pub cells: Vec<String>,
}

impl ExportRow {
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Projects records onto a validated list of display fields
#[derive(Debug, Clone)]
pub struct Projector<'a> {
    schema: &'a Schema,
    fields: Vec<String>,
}

impl<'a> Projector<'a> {
    /// Creates a projector. An empty list selects every schema field, keys first.
    /// Fails on the first undeclared field.
    pub fn new<S: AsRef<str>>(schema: &'a Schema, display_fields: &[S]) -> SchemaResult<Self> {
        let fields: Vec<String> = if display_fields.is_empty() {
            schema.field_names()
        } else {
            schema.validate_fields(display_fields)?;
            display_fields
                .iter()
                .map(|f| f.as_ref().to_string())
                .collect()
        };
        Ok(Self { schema, fields })
    }

    /// Display fields in column order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Renders one record. Missing fields become empty cells.
    pub fn row(&self, record: &Record) -> ExportRow {
        let cells = self
            .fields
            .iter()
            .map(|name| match record.field(self.schema, name) {
                Ok(Some(value)) => self.render_cell(name, value),
                _ => String::new(),
            })
            .collect();
        ExportRow { cells }
    }

    /// Renders every record, in order
    pub fn rows(&self, records: &[Record]) -> Vec<ExportRow> {
        records.iter().map(|r| self.row(r)).collect()
    }

    /// Produces the tabular view and the export rows for the same records
    pub fn format(&self, records: &[Record]) -> (TableView, Vec<ExportRow>) {
        let rows = self.rows(records);
        let view = TableView::new(self.fields.clone(), rows.clone());
        (view, rows)
    }

    fn render_cell(&self, name: &str, value: &Value) -> String {
        let field_type = self
            .schema
            .field(name)
            .map_or(FieldType::String, |d| d.field_type);

        if field_type == FieldType::Int {
            if let Ok(Some(Scalar::Int(i))) = self.schema.coerce_value(name, value) {
                return i.to_string();
            }
        }

        let text = plain_text(value);
        if self.schema.escape_sort_key && name == self.schema.sort_key.name {
            unescape_key(&text)
        } else {
            text
        }
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(plain_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;

    fn heat() -> Record {
        Record::new()
            .with("year", 1995)
            .with("title", "Heat")
            .with("running_time_secs", "10200.0")
    }

    #[test]
    fn test_missing_field_is_empty_cell() {
        let schema = Schema::movies();
        let projector = Projector::new(&schema, &["title", "rating"]).unwrap();
        assert_eq!(projector.row(&heat()).cells, vec!["Heat", ""]);
    }

    #[test]
    fn test_column_order_follows_request() {
        let schema = Schema::movies();
        let projector = Projector::new(&schema, &["title", "year"]).unwrap();
        assert_eq!(projector.row(&heat()).cells, vec!["Heat", "1995"]);
    }

    #[test]
    fn test_integer_fields_render_as_integers() {
        let schema = Schema::movies();
        let projector = Projector::new(&schema, &["running_time_secs"]).unwrap();
        assert_eq!(projector.row(&heat()).cells, vec!["10200"]);
    }

    #[test]
    fn test_escaped_sort_key_is_restored() {
        let schema = Schema::movies().with_escaped_sort_key(true);
        let record = Record::new()
            .with("year", "1997")
            .with("title", "Face!fOff, Part 2");
        let projector = Projector::new(&schema, &["title"]).unwrap();
        assert_eq!(projector.row(&record).cells, vec!["Face/Off, Part 2"]);
    }

    #[test]
    fn test_unescaped_schema_keeps_bang_sequences() {
        let schema = Schema::movies();
        let record = Record::new().with("year", 1997).with("title", "Yes!f");
        let projector = Projector::new(&schema, &["title"]).unwrap();
        assert_eq!(projector.row(&record).cells, vec!["Yes!f"]);
    }

    #[test]
    fn test_lists_join_with_comma() {
        let schema = Schema::movies();
        let record = heat().with("genres", serde_json::json!(["Crime", "Drama"]));
        let projector = Projector::new(&schema, &["genres"]).unwrap();
        assert_eq!(projector.row(&record).cells, vec!["Crime, Drama"]);
    }

    #[test]
    fn test_empty_selection_means_all_fields() {
        let schema = Schema::movies();
        let projector = Projector::new::<&str>(&schema, &[]).unwrap();
        assert_eq!(projector.fields(), schema.field_names().as_slice());
        assert_eq!(projector.fields()[0], "year");
    }

    #[test]
    fn test_unknown_display_field_rejected() {
        let schema = Schema::movies();
        let err = Projector::new(&schema, &["title", "budget"]).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::KvqUnknownField);
    }

    #[test]
    fn test_format_returns_view_and_rows() {
        let schema = Schema::movies();
        let projector = Projector::new(&schema, &["title"]).unwrap();
        let (view, rows) = projector.format(&[heat(), heat()]);
        assert_eq!(rows.len(), 2);
        assert_eq!(view.len(), 2);
    }
}
