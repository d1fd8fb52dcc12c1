// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField};

use super::columns::*;

/// Arrow type of a column in the case table.
///
/// - `filing_date`                  → Date32
/// - `year_num`, `month_sort_key`   → Int32
/// - everything else (raw or derived) → Utf8
pub fn column_type(name: &str) -> DataType {
    match name {
        FILING_DATE => DataType::Date32,
        YEAR_NUM | MONTH_SORT_KEY => DataType::Int32,
        _ => DataType::Utf8,
    }
}

/// Nullable field for `name` with its case-table type.
pub fn column_field(name: &str) -> ArrowField {
    ArrowField::new(name, column_type(name), /* nullable = */ true)
}
