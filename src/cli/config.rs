//! Configuration file
//!
//! A single JSON object. Only `data_dir` is required; everything else has a default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::backend::Backend;
use crate::executor::DEFAULT_MAX_PAGES;
use crate::observability::Severity;
use crate::schema::{Schema, SchemaLoader};
use crate::store::DEFAULT_PAGE_SIZE;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding table files (required)
    pub data_dir: String,

    /// Storage flavour (optional, default "table")
    #[serde(default)]
    pub backend: Backend,

    /// Items evaluated per store page (optional, default 25)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Pagination cap per query (optional, default 10000)
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Where CSV exports are written (optional, default ".")
    #[serde(default = "default_export_dir")]
    pub export_dir: String,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Schema file replacing the built-in movie schema
    #[serde(default)]
    pub schema_path: Option<String>,

    /// Source data set for `init`
    #[serde(default = "default_movie_data")]
    pub movie_data: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}
fn default_export_dir() -> String {
    ".".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_movie_data() -> String {
    "data/moviedata.json".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.page_size == 0 {
            return Err(CliError::config_error("page_size must be > 0"));
        }

        if self.max_pages == 0 {
            return Err(CliError::config_error("max_pages must be > 0"));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(CliError::config_error)
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn export_path(&self) -> &Path {
        Path::new(&self.export_dir)
    }

    pub fn movie_data_path(&self) -> &Path {
        Path::new(&self.movie_data)
    }

    /// The schema in effect, adjusted to the configured backend
    pub fn schema(&self) -> CliResult<Schema> {
        let schema = match &self.schema_path {
            Some(path) => SchemaLoader::load(Path::new(path))?,
            None => Schema::movies(),
        };
        Ok(self.backend.apply(schema))
    }

    /// File holding the table for this backend
    pub fn table_path(&self, schema: &Schema) -> PathBuf {
        self.data_path()
            .join(self.backend.table_file_name(&schema.table_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_json(r#"{"data_dir": "/tmp/kvq"}"#).unwrap();
        assert_eq!(config.backend, Backend::Table);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.max_pages, 10_000);
        assert_eq!(config.export_dir, ".");
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert!(config.schema_path.is_none());
    }

    #[test]
    fn test_missing_data_dir_rejected() {
        let err = Config::from_json(r#"{"backend": "document"}"#).unwrap_err();
        assert_eq!(err.code_str(), "KVQ_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(Config::from_json(r#"{"data_dir": "d", "page_size": 0}"#).is_err());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        assert!(Config::from_json(r#"{"data_dir": "d", "log_level": "loud"}"#).is_err());
    }

    #[test]
    fn test_table_path_per_backend() {
        let config = Config::from_json(r#"{"data_dir": "/data", "backend": "document"}"#).unwrap();
        let schema = config.schema().unwrap();
        assert_eq!(
            config.table_path(&schema),
            PathBuf::from("/data/MoviesInfo_document.json")
        );
        assert!(!schema.escape_sort_key);
    }
}
