//! Record type and schema-checked field access

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{Scalar, Schema};

/// One component of a record key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Int(i64),
    Text(String),
}

impl KeyValue {
    fn from_scalar(field: &str, scalar: Scalar) -> SchemaResult<Self> {
        match scalar {
            Scalar::Int(i) => Ok(KeyValue::Int(i)),
            Scalar::Text(s) => Ok(KeyValue::Text(s)),
            Scalar::Decimal(d) => Err(SchemaError::type_mismatch(field, "int or string", d)),
        }
    }
}

/// Composite primary key (partition, sort). Orders partition first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub partition: KeyValue,
    pub sort: KeyValue,
}

/// A single table item: field name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    attributes: Map<String, Value>,
}

impl Record {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Reads a field by name.
    ///
    /// Fails with `KVQ_UNKNOWN_FIELD` when the schema does not declare `name`;
    /// returns `Ok(None)` when the field is declared but absent from this record.
    pub fn field(&self, schema: &Schema, name: &str) -> SchemaResult<Option<&Value>> {
        schema.field(name)?;
        Ok(self.attributes.get(name).filter(|v| !v.is_null()))
    }

    /// Reads a field coerced to its declared type
    pub fn scalar(&self, schema: &Schema, name: &str) -> SchemaResult<Option<Scalar>> {
        match self.field(schema, name)? {
            Some(value) => schema.coerce_value(name, value),
            None => Ok(None),
        }
    }

    /// Extracts the composite key; both key fields must be present and well typed
    pub fn key(&self, schema: &Schema) -> SchemaResult<RecordKey> {
        let [pk, sk] = schema.key_names();
        Ok(RecordKey {
            partition: self.key_component(schema, pk)?,
            sort: self.key_component(schema, sk)?,
        })
    }

    fn key_component(&self, schema: &Schema, name: &str) -> SchemaResult<KeyValue> {
        let value = self
            .field(schema, name)?
            .ok_or_else(|| SchemaError::missing_key(name))?;
        let scalar = schema.coerce_value(name, value)?.ok_or_else(|| {
            let expected = schema
                .field(name)
                .map_or("key", |d| d.field_type.type_name());
            SchemaError::type_mismatch(name, expected, value)
        })?;
        KeyValue::from_scalar(name, scalar)
    }

    /// Returns a copy holding only the named fields that are present
    pub fn project<S: AsRef<str>>(&self, fields: &[S]) -> Record {
        let attributes = fields
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                self.attributes
                    .get(name)
                    .map(|v| (name.to_string(), v.clone()))
            })
            .collect();
        Record { attributes }
    }

    /// Number of populated fields
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterates over populated fields
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.attributes.iter()
    }
}
