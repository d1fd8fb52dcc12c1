// src/normalize/mod.rs
pub mod aliases;
pub mod date_parser;
pub mod derive;
pub mod trimming;

use crate::error::DataLoadError;
use crate::load::RawTable;
use crate::schema::columns::*;
use crate::schema::column_field;
use arrow::{
    array::{Array, ArrayRef, BooleanArray, StringArray},
    compute::filter_record_batch,
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::{RecordBatch, RecordBatchOptions},
    util::display::array_value_to_string,
};
use std::{collections::HashSet, sync::Arc};
use tracing::info;

/// The normalized case list. Immutable; filtering yields a new table.
#[derive(Debug, Clone)]
pub struct CaseTable {
    batch: RecordBatch,
}

impl CaseTable {
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().column_with_name(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    /// A Utf8 column, if present.
    pub fn strings(&self, name: &str) -> Option<&StringArray> {
        self.column(name)?.as_any().downcast_ref::<StringArray>()
    }

    /// Values of any column as display strings, nulls kept as `None`.
    pub fn text_values(&self, name: &str) -> Option<Vec<Option<String>>> {
        if let Some(sarr) = self.strings(name) {
            return Some(sarr.iter().map(|v| v.map(str::to_string)).collect());
        }
        let arr = self.column(name)?;
        Some(
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        None
                    } else {
                        array_value_to_string(arr, i).ok()
                    }
                })
                .collect(),
        )
    }

    /// Rows where `mask` is true.
    pub fn filter(&self, mask: &BooleanArray) -> Result<CaseTable, ArrowError> {
        Ok(CaseTable::new(filter_record_batch(&self.batch, mask)?))
    }

    /// Just the named columns that exist, in the order given.
    pub fn project(&self, names: &[&str]) -> Result<RecordBatch, ArrowError> {
        let schema = self.batch.schema();
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|name| schema.index_of(name).ok())
            .collect();
        self.batch.project(&indices)
    }
}

/// Turn the raw sheet into the canonical case table.
///
/// Columns are renamed onto canonical names, duplicate case numbers dropped (first one
/// wins), the derived year/date/month/location columns appended, and the text columns
/// trimmed. Missing source columns leave their derived columns entirely null.
#[tracing::instrument(level = "info", skip(raw), fields(rows = raw.rows.len(), columns = raw.headers.len()))]
pub fn normalize(raw: RawTable) -> Result<CaseTable, DataLoadError> {
    let headers = aliases::rename_columns(&raw.headers);
    let batch = string_batch(&headers, &raw.rows)?;
    let batch = dedupe_case_numbers(batch)?;

    let rows = batch.num_rows();
    let mut columns = ColumnSet::from_batch(&batch);

    let case_numbers = columns.strings(CASE_NUMBER);
    let case_year = derive::case_years(case_numbers, rows);

    let dates = derive::filing_dates(columns.strings(FILING_DATE_RAW), rows);
    let months = derive::month_columns(&dates);

    let (zone, municipality) =
        derive::zones_and_municipalities(columns.strings(OCCURRENCE_LOCATION), rows);

    columns.set(CASE_YEAR, Arc::new(case_year));
    columns.set(FILING_DATE, Arc::new(months.filing_date));
    columns.set(MONTH_NAME, Arc::new(months.month_name));
    columns.set(YEAR_NUM, Arc::new(months.year_num));
    columns.set(MONTH_LABEL, Arc::new(months.month_label));
    columns.set(MONTH_SORT_KEY, Arc::new(months.month_sort_key));
    columns.set(ZONE, Arc::new(zone));
    columns.set(MUNICIPALITY, Arc::new(municipality));

    let batch = trimming::apply_cleaning(&columns.into_batch(rows)?, CLEANED_COLUMNS)?;
    info!(rows = batch.num_rows(), columns = batch.num_columns(), "normalized case table");
    Ok(CaseTable::new(batch))
}

/// Every raw column as nullable Utf8.
fn string_batch(headers: &[String], rows: &[Vec<Option<String>>]) -> Result<RecordBatch, ArrowError> {
    let fields: Vec<Field> = headers
        .iter()
        .map(|h| Field::new(h, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = (0..headers.len())
        .map(|col| {
            let arr: StringArray = rows
                .iter()
                .map(|row| row.get(col).and_then(|c| c.as_deref()))
                .collect();
            Arc::new(arr) as ArrayRef
        })
        .collect();
    RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &RecordBatchOptions::new().with_row_count(Some(rows.len())),
    )
}

/// Keep the first row for each case number. Nulls count as one shared value.
fn dedupe_case_numbers(batch: RecordBatch) -> Result<RecordBatch, ArrowError> {
    let Some(case_numbers) = batch
        .column_by_name(CASE_NUMBER)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
    else {
        return Ok(batch);
    };

    let keep: BooleanArray = {
        let mut seen: HashSet<Option<&str>> = HashSet::with_capacity(case_numbers.len());
        case_numbers.iter().map(|v| Some(seen.insert(v))).collect()
    };
    let dropped = keep.false_count();
    if dropped == 0 {
        return Ok(batch);
    }

    info!(dropped, "dropped duplicate case numbers");
    filter_record_batch(&batch, &keep)
}

/// Ordered column list that lets derived columns replace same-named raw ones in place.
struct ColumnSet {
    fields: Vec<Field>,
    arrays: Vec<ArrayRef>,
}

impl ColumnSet {
    fn from_batch(batch: &RecordBatch) -> Self {
        Self {
            fields: batch
                .schema()
                .fields()
                .iter()
                .map(|f| f.as_ref().clone())
                .collect(),
            arrays: batch.columns().to_vec(),
        }
    }

    fn strings(&self, name: &str) -> Option<&StringArray> {
        let idx = self.fields.iter().position(|f| f.name() == name)?;
        self.arrays[idx].as_any().downcast_ref::<StringArray>()
    }

    fn set(&mut self, name: &str, array: ArrayRef) {
        let field = column_field(name);
        match self.fields.iter().position(|f| f.name() == name) {
            Some(idx) => {
                self.fields[idx] = field;
                self.arrays[idx] = array;
            }
            None => {
                self.fields.push(field);
                self.arrays.push(array);
            }
        }
    }

    fn into_batch(self, rows: usize) -> Result<RecordBatch, ArrowError> {
        RecordBatch::try_new_with_options(
            Arc::new(Schema::new(self.fields)),
            self.arrays,
            &RecordBatchOptions::new().with_row_count(Some(rows)),
        )
    }
}
