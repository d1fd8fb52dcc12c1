use arrow::error::ArrowError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop the source file from becoming a case table.
///
/// Individual malformed cells never surface here; they turn into nulls.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a readable workbook: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet {sheet:?} not found in {path} (available: {available:?})")]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: Vec<String>,
    },

    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported input format: {path} (expected a workbook or .csv)")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to assemble case table: {0}")]
    Table(#[from] ArrowError),
}
