//! CSV export
//!
//! Header line of display field names, then one line per row. Fields are quoted only
//! when they contain a comma, a quote or a line break; embedded quotes are doubled.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::errors::{FormatError, FormatResult};
use super::projector::ExportRow;

/// Writes export rows as CSV
pub struct CsvExporter;

impl CsvExporter {
    /// Writes header and rows to any writer
    pub fn write<W: Write>(writer: W, headers: &[String], rows: &[ExportRow]) -> FormatResult<()> {
        let mut csv = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);

        csv.write_record(headers)?;
        for (i, row) in rows.iter().enumerate() {
            if row.cells.len() != headers.len() {
                return Err(FormatError::RowWidth {
                    row: i + 1,
                    expected: headers.len(),
                    actual: row.cells.len(),
                });
            }
            csv.write_record(&row.cells)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Renders header and rows to a string
    pub fn to_csv_string(headers: &[String], rows: &[ExportRow]) -> FormatResult<String> {
        let mut buf = Vec::new();
        Self::write(&mut buf, headers, rows)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Writes the export file, creating its directory if needed. Returns the number
    /// of data rows written.
    pub fn export_to_file(path: &Path, headers: &[String], rows: &[ExportRow]) -> FormatResult<usize> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Self::write(file, headers, rows)?;
        Ok(rows.len())
    }
}
