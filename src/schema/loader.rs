//! Schema loader
//!
//! Reads a schema definition from a JSON file. A missing or malformed file is a
//! startup failure; there is no fallback to the built-in schema once a path is given.

use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Loads and saves schema files
pub struct SchemaLoader;

impl SchemaLoader {
    /// Loads a single schema file and validates its structure
    pub fn load(path: &Path) -> SchemaResult<Schema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let schema: Schema = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(path.display().to_string(), e))?;

        Ok(schema)
    }

    /// Writes a schema file, pretty-printed
    pub fn save(schema: &Schema, path: &Path) -> SchemaResult<()> {
        let content = serde_json::to_string_pretty(schema).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to serialize schema: {}", e),
            )
        })?;

        fs::write(path, content).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to write file: {}", e),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("schema.json");

        let schema = Schema::movies().with_escaped_sort_key(true);
        SchemaLoader::save(&schema, &path).unwrap();

        let loaded = SchemaLoader::load(&path).unwrap();
        assert_eq!(loaded, schema);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let err = SchemaLoader::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.code().code(), "KVQ_MALFORMED_SCHEMA");
    }

    #[test]
    fn test_invalid_structure_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("schema.json");
        fs::write(
            &path,
            r#"{
                "table_name": "Scores",
                "partition_key": {"name": "score", "type": "decimal"},
                "sort_key": {"name": "player", "type": "string"}
            }"#,
        )
        .unwrap();

        let err = SchemaLoader::load(&path).unwrap_err();
        assert!(err.message().contains("partition key"));
    }

    #[test]
    fn test_info_fields_default_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("schema.json");
        fs::write(
            &path,
            r#"{
                "table_name": "Books",
                "partition_key": {"name": "shelf", "type": "int"},
                "sort_key": {"name": "isbn", "type": "string"}
            }"#,
        )
        .unwrap();

        let schema = SchemaLoader::load(&path).unwrap();
        assert!(schema.info_fields.is_empty());
        assert!(!schema.escape_sort_key);
    }
}
