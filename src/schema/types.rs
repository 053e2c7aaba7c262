//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - decimal: 64-bit floating point
//!
//! A schema names exactly one partition key, one sort key, and any number of info
//! fields. Everything a query touches (filter, sort, projection) must be declared here.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::escape::escape_key;

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Decimal,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Decimal => "decimal",
        }
    }

    /// Returns true for int and decimal
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Int | FieldType::Decimal)
    }
}

/// A value coerced to its field's declared type
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Decimal(f64),
    Text(String),
}

impl Scalar {
    /// Compares two scalars.
    ///
    /// Int and decimal compare numerically with each other. Text only compares with
    /// text. Any other pairing has no ordering.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            (Scalar::Decimal(a), Scalar::Decimal(b)) => Some(a.total_cmp(b)),
            (Scalar::Int(a), Scalar::Decimal(b)) => Some((*a as f64).total_cmp(b)),
            (Scalar::Decimal(a), Scalar::Int(b)) => Some(a.total_cmp(&(*b as f64))),
            (Scalar::Text(a), Scalar::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Decimal(d) => write!(f, "{}", d),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as stored
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn decimal(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Decimal)
    }
}

/// The part a field plays in the record key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    PartitionKey,
    SortKey,
    Info,
}

impl FieldRole {
    pub fn is_key(&self) -> bool {
        !matches!(self, FieldRole::Info)
    }
}

/// Complete table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Table name in the backing store
    pub table_name: String,
    /// Coarse grouping key
    pub partition_key: FieldDef,
    /// Ordering/uniqueness key within a partition
    pub sort_key: FieldDef,
    /// Optional, non-key attributes in display order
    #[serde(default)]
    pub info_fields: Vec<FieldDef>,
    /// Whether sort key values are stored escaped (see `escape`)
    #[serde(default)]
    pub escape_sort_key: bool,
}

impl Schema {
    /// Create a schema with no info fields
    pub fn new(table_name: impl Into<String>, partition_key: FieldDef, sort_key: FieldDef) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key,
            sort_key,
            info_fields: Vec::new(),
            escape_sort_key: false,
        }
    }

    /// Adds an info field
    pub fn with_info(mut self, field: FieldDef) -> Self {
        self.info_fields.push(field);
        self
    }

    /// Sets whether sort keys are stored escaped
    pub fn with_escaped_sort_key(mut self, escaped: bool) -> Self {
        self.escape_sort_key = escaped;
        self
    }

    /// The built-in movie catalogue schema
    pub fn movies() -> Self {
        Self::new("MoviesInfo", FieldDef::int("year"), FieldDef::string("title"))
            .with_info(FieldDef::string("directors"))
            .with_info(FieldDef::string("actors"))
            .with_info(FieldDef::string("release_date"))
            .with_info(FieldDef::string("genres"))
            .with_info(FieldDef::string("image_url"))
            .with_info(FieldDef::int("running_time_secs"))
            .with_info(FieldDef::string("plot"))
            .with_info(FieldDef::int("rank"))
            .with_info(FieldDef::decimal("rating"))
    }

    /// Validates the schema structure itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.table_name.trim().is_empty() {
            return Err("table_name must not be empty".into());
        }

        if self.partition_key.field_type == FieldType::Decimal {
            return Err("partition key must be int or string".into());
        }
        if self.sort_key.field_type == FieldType::Decimal {
            return Err("sort key must be int or string".into());
        }
        if self.escape_sort_key && self.sort_key.field_type != FieldType::String {
            return Err("only a string sort key can be stored escaped".into());
        }

        let mut seen = std::collections::HashSet::new();
        for def in self.fields() {
            if def.name.trim().is_empty() {
                return Err("field names must not be empty".into());
            }
            if !seen.insert(def.name.as_str()) {
                return Err(format!("field '{}' is declared twice", def.name));
            }
        }

        Ok(())
    }

    /// All field definitions, keys first
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        [&self.partition_key, &self.sort_key]
            .into_iter()
            .chain(self.info_fields.iter())
    }

    /// All field names, keys first
    pub fn field_names(&self) -> Vec<String> {
        self.fields().map(|f| f.name.clone()).collect()
    }

    /// Names of the two key fields (partition, sort)
    pub fn key_names(&self) -> [&str; 2] {
        [&self.partition_key.name, &self.sort_key.name]
    }

    /// Returns true if the schema declares `name`
    pub fn contains(&self, name: &str) -> bool {
        self.fields().any(|f| f.name == name)
    }

    /// Looks up a field definition, failing on unknown names
    pub fn field(&self, name: &str) -> SchemaResult<&FieldDef> {
        self.fields()
            .find(|f| f.name == name)
            .ok_or_else(|| SchemaError::unknown_field(name))
    }

    /// Returns the role `name` plays in the record key
    pub fn role(&self, name: &str) -> SchemaResult<FieldRole> {
        if name == self.partition_key.name {
            Ok(FieldRole::PartitionKey)
        } else if name == self.sort_key.name {
            Ok(FieldRole::SortKey)
        } else {
            self.field(name).map(|_| FieldRole::Info)
        }
    }

    /// Fails on the first undeclared name
    pub fn validate_fields<S: AsRef<str>>(&self, names: &[S]) -> SchemaResult<()> {
        for name in names {
            self.field(name.as_ref())?;
        }
        Ok(())
    }

    /// Coerces a user-supplied literal to the field's declared type.
    ///
    /// Sort key literals are escaped when the schema stores escaped keys, so they
    /// compare against stored values as written.
    pub fn coerce_literal(&self, name: &str, raw: &str) -> SchemaResult<Scalar> {
        let def = self.field(name)?;
        match def.field_type {
            FieldType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Scalar::Int)
                .map_err(|_| SchemaError::type_mismatch(name, "int", raw)),
            FieldType::Decimal => match raw.trim().parse::<f64>() {
                Ok(d) if d.is_finite() => Ok(Scalar::Decimal(d)),
                _ => Err(SchemaError::type_mismatch(name, "decimal", raw)),
            },
            FieldType::String => {
                if self.escape_sort_key && name == self.sort_key.name {
                    Ok(Scalar::Text(escape_key(raw)))
                } else {
                    Ok(Scalar::Text(raw.to_string()))
                }
            }
        }
    }

    /// Coerces a stored value to the field's declared type.
    ///
    /// Table-style stores keep every property as a string, so numeric fields also
    /// accept numeric strings. Returns `Ok(None)` for null or uncoercible values.
    pub fn coerce_value(&self, name: &str, value: &Value) -> SchemaResult<Option<Scalar>> {
        let def = self.field(name)?;
        Ok(coerce_stored(def.field_type, value))
    }
}

fn coerce_stored(field_type: FieldType, value: &Value) -> Option<Scalar> {
    match field_type {
        FieldType::Int => match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(Scalar::Int),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().map(Scalar::Int).or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite() && f.fract() == 0.0)
                        .map(|f| Scalar::Int(f as i64))
                })
            }
            _ => None,
        },
        FieldType::Decimal => match value {
            Value::Number(n) => n.as_f64().map(Scalar::Decimal),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Scalar::Decimal),
            _ => None,
        },
        FieldType::String => match value {
            Value::String(s) => Some(Scalar::Text(s.clone())),
            Value::Number(n) => Some(Scalar::Text(n.to_string())),
            Value::Bool(b) => Some(Scalar::Text(b.to_string())),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_schema_structure_valid() {
        let schema = Schema::movies();
        assert!(schema.validate_structure().is_ok());
        assert_eq!(schema.key_names(), ["year", "title"]);
        assert_eq!(schema.field_names().len(), 11);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let schema = Schema::movies().with_info(FieldDef::int("rank"));
        let result = schema.validate_structure();
        assert!(result.unwrap_err().contains("rank"));
    }

    #[test]
    fn test_decimal_key_rejected() {
        let schema = Schema::new("t", FieldDef::decimal("score"), FieldDef::string("name"));
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_roles() {
        let schema = Schema::movies();
        assert_eq!(schema.role("year").unwrap(), FieldRole::PartitionKey);
        assert_eq!(schema.role("title").unwrap(), FieldRole::SortKey);
        assert_eq!(schema.role("rank").unwrap(), FieldRole::Info);
        assert!(schema.role("budget").is_err());
    }

    #[test]
    fn test_validate_fields_fails_fast() {
        let schema = Schema::movies();
        assert!(schema.validate_fields(&["title", "rating"]).is_ok());

        let err = schema.validate_fields(&["title", "budget"]).unwrap_err();
        assert_eq!(err.field(), Some("budget"));
    }

    #[test]
    fn test_coerce_literal_by_type() {
        let schema = Schema::movies();
        assert_eq!(schema.coerce_literal("year", " 1995 ").unwrap(), Scalar::Int(1995));
        assert_eq!(
            schema.coerce_literal("rating", "7.5").unwrap(),
            Scalar::Decimal(7.5)
        );
        assert_eq!(
            schema.coerce_literal("plot", "heist").unwrap(),
            Scalar::Text("heist".into())
        );
    }

    #[test]
    fn test_coerce_literal_type_mismatch() {
        let schema = Schema::movies();
        let err = schema.coerce_literal("year", "nineteen").unwrap_err();
        assert_eq!(err.code().code(), "KVQ_TYPE_MISMATCH");

        assert!(schema.coerce_literal("rating", "NaN").is_err());
    }

    #[test]
    fn test_sort_key_literal_escaped_when_configured() {
        let schema = Schema::movies().with_escaped_sort_key(true);
        assert_eq!(
            schema.coerce_literal("title", "Face/Off").unwrap(),
            Scalar::Text("Face!fOff".into())
        );

        // Info fields are never escaped
        assert_eq!(
            schema.coerce_literal("plot", "a/b").unwrap(),
            Scalar::Text("a/b".into())
        );
    }

    #[test]
    fn test_coerce_stored_numeric_strings() {
        let schema = Schema::movies();
        assert_eq!(
            schema.coerce_value("rank", &json!("10")).unwrap(),
            Some(Scalar::Int(10))
        );
        assert_eq!(
            schema.coerce_value("running_time_secs", &json!("7200.0")).unwrap(),
            Some(Scalar::Int(7200))
        );
        assert_eq!(
            schema.coerce_value("rating", &json!("8.1")).unwrap(),
            Some(Scalar::Decimal(8.1))
        );
        assert_eq!(schema.coerce_value("rank", &json!("n/a")).unwrap(), None);
        assert_eq!(schema.coerce_value("rank", &json!(null)).unwrap(), None);
    }

    #[test]
    fn test_scalar_ordering() {
        assert_eq!(
            Scalar::Int(9).compare(&Scalar::Int(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Scalar::Decimal(8.0).compare(&Scalar::Int(7)),
            Some(Ordering::Greater)
        );
        assert_eq!(Scalar::Text("9".into()).compare(&Scalar::Int(9)), None);
    }

    #[test]
    fn test_schema_json_round_trip() {
        let schema = Schema::movies().with_escaped_sort_key(true);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("\"type\":\"decimal\""));

        let parsed: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schema);
    }
}
