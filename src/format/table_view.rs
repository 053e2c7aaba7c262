//! Plain-text table for the terminal

use std::fmt;

use super::projector::ExportRow;

/// Widest a column may grow before cells are truncated
pub const MAX_COLUMN_WIDTH: usize = 40;

/// Header, separator, aligned rows, count footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    headers: Vec<String>,
    rows: Vec<ExportRow>,
}

impl TableView {
    pub fn new(headers: Vec<String>, rows: Vec<ExportRow>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.cells.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    /// Renders the whole table
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn fit(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    if len <= width {
        return format!("{}{}", cell, " ".repeat(width - len));
    }
    if width <= 3 {
        return cell.chars().take(width).collect();
    }
    let mut out: String = cell.chars().take(width - 3).collect();
    out.push_str("...");
    out
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line = widths
        .iter()
        .enumerate()
        .map(|(i, w)| fit(cells.get(i).map_or("", String::as_str), *w))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(f, "{}", line.trim_end())
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();

        write_line(f, &self.headers, &widths)?;
        let separator = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-");
        writeln!(f, "{}", separator)?;
        for row in &self.rows {
            write_line(f, &row.cells, &widths)?;
        }

        let noun = if self.rows.len() == 1 { "record" } else { "records" };
        write!(f, "({} {})", self.rows.len(), noun)
    }
}
