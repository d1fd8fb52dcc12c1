// src/load/workbook.rs
//
// Spreadsheet input through calamine: .xlsx/.xlsm/.xlsb/.xls/.ods.

use crate::error::DataLoadError;
use crate::load::{non_blank, RawTable};
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use chrono::{NaiveDateTime, NaiveTime};
use std::{fs, io::Cursor, path::Path};
use tracing::debug;

/// The sheet the case list lives in.
pub const DEFAULT_SHEET: &str = "Lista";

/// Extensions read as workbooks.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

fn open(path: &Path) -> Result<Sheets<Cursor<Vec<u8>>>, DataLoadError> {
    let bytes = fs::read(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|source| DataLoadError::Workbook {
        path: path.to_path_buf(),
        source,
    })
}

/// Names of all sheets in the workbook, in workbook order.
pub fn list_sheets<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DataLoadError> {
    Ok(open(path.as_ref())?.sheet_names())
}

/// Load `sheet` from the workbook at `path`.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_sheet<P: AsRef<Path>>(path: P, sheet: &str) -> Result<RawTable, DataLoadError> {
    let path = path.as_ref();
    let mut workbook = open(path)?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet) {
        return Err(DataLoadError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| DataLoadError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;
    let (height, width) = range.get_size();
    debug!(sheet, height, width, start = ?range.start(), "read worksheet range");

    let grid = range
        .rows()
        .map(|row| row.iter().map(render_cell).collect())
        .collect();
    Ok(RawTable::from_grid(grid))
}

/// Cell as the text the rest of the pipeline sees. Blank and error cells are `None`.
fn render_cell(cell: &Data) -> Option<String> {
    let rendered = match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Data::DateTime(dt) => format_datetime(dt.as_datetime()?),
        Data::Error(_) | Data::Empty => return None,
    };
    non_blank(rendered)
}

/// Integral values lose the trailing `.0`.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// `YYYY-MM-DD`, with ` HH:MM:SS` only when there is a time of day.
fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
