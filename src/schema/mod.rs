pub mod arrow;
pub mod columns;

pub use arrow::{column_field, column_type};
pub use columns::{month_number, COLUMN_ALIASES, MONTH_NAMES, SUMMARY_COLUMNS};
