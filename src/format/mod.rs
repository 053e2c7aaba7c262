//! Output formatting for kvquery
//!
//! Narrows query results to display fields and renders them as a terminal table
//! or a CSV export file.
//!
//! # Design Principles
//!
//! 1. Column order is exactly the requested display order
//! 2. A missing field is an empty cell, never an error or a dropped row
//! 3. Integer fields display as integers whatever their stored form
//! 4. Escaped sort keys are restored before display and export

mod errors;
mod export;
mod projector;
mod table_view;

pub use errors::{FormatError, FormatResult};
pub use export::CsvExporter;
pub use projector::{ExportRow, Projector};
pub use table_view::{TableView, MAX_COLUMN_WIDTH};
