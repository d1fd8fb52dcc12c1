use arrow::{
    array::{ArrayRef, StringArray},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Trim whitespace; the literal strings "nan" and "None" mean no value.
pub fn clean_text(raw: &str) -> Option<String> {
    match raw.trim() {
        "nan" | "None" => None,
        trimmed => Some(trimmed.to_string()),
    }
}

/// Apply [`clean_text`] to the named string columns; other columns pass through.
pub fn apply_cleaning(batch: &RecordBatch, columns: &[&str]) -> Result<RecordBatch, ArrowError> {
    if columns.is_empty() {
        return Ok(batch.clone());
    }

    let mut cols = Vec::with_capacity(batch.num_columns());
    for (i, field) in batch.schema().fields().iter().enumerate() {
        let arr = batch.column(i);
        if columns.contains(&field.name().as_str()) {
            if let Some(sarr) = arr.as_any().downcast_ref::<StringArray>() {
                let cleaned: StringArray = sarr.iter().map(|opt| opt.and_then(clean_text)).collect();
                cols.push(Arc::new(cleaned) as ArrayRef);
                continue;
            }
        }
        cols.push(arr.clone());
    }

    RecordBatch::try_new(batch.schema(), cols)
}
