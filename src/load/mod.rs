// src/load/mod.rs
pub mod cache;
pub mod workbook;

use crate::error::DataLoadError;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info, warn};

pub use workbook::{list_sheets, DEFAULT_SHEET, WORKBOOK_EXTENSIONS};

/// Cells of the source sheet as read, before any column mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column names from the first non-empty row. Blank names become `Unnamed: <index>`.
    pub headers: Vec<String>,
    /// Data rows, each padded or truncated to `headers.len()`. `None` is an empty cell.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Build a table from a dense grid whose first row holds the headers.
    /// Rows with no values at all are dropped.
    pub fn from_grid(grid: Vec<Vec<Option<String>>>) -> Self {
        let mut grid = grid
            .into_iter()
            .filter(|row| row.iter().any(Option::is_some));

        let headers: Vec<String> = match grid.next() {
            Some(header_row) => header_row
                .into_iter()
                .enumerate()
                .map(|(idx, cell)| match cell.map(|c| c.trim().to_string()) {
                    Some(name) if !name.is_empty() => name,
                    _ => format!("Unnamed: {}", idx),
                })
                .collect(),
            None => return Self::default(),
        };

        let width = headers.len();
        let mut truncated = 0usize;
        let rows = grid
            .map(|mut row| {
                if row.len() > width {
                    if row[width..].iter().any(Option::is_some) {
                        truncated += 1;
                    }
                    row.truncate(width);
                }
                row.resize(width, None);
                row
            })
            .collect::<Vec<_>>();

        if truncated > 0 {
            warn!(
                truncated,
                width, "some rows have more cells than headers; extra cells dropped"
            );
        }

        Self { headers, rows }
    }
}

/// A cell's text, or `None` when it is empty or only whitespace.
/// Every reader goes through this so blank cells look the same whatever the format.
pub(crate) fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Read the source file into a [`RawTable`].
///
/// Workbooks are read from `sheet`; `.csv` files are read whole.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_raw_table<P: AsRef<Path>>(path: P, sheet: &str) -> Result<RawTable, DataLoadError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let table = match ext.as_deref() {
        Some("csv") => load_csv(path)?,
        Some(e) if WORKBOOK_EXTENSIONS.contains(&e) => workbook::load_sheet(path, sheet)?,
        _ => {
            return Err(DataLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    info!(
        rows = table.rows.len(),
        columns = table.headers.len(),
        "loaded raw table"
    );
    Ok(table)
}

/// Header row first; ragged records tolerated; empty fields become `None`.
fn load_csv(path: &Path) -> Result<RawTable, DataLoadError> {
    let csv_err = |source| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let mut grid = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let row: Vec<Option<String>> = record
            .iter()
            .map(|field| non_blank(field.to_string()))
            .collect();
        if idx == 0 {
            debug!(fields = row.len(), "csv header row");
        }
        grid.push(row);
    }

    Ok(RawTable::from_grid(grid))
}
