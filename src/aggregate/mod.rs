// src/aggregate/mod.rs

use crate::normalize::CaseTable;
use crate::schema::columns::CASE_YEAR;
use arrow::{
    array::{ArrayRef, StringArray, UInt64Array},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use serde::Serialize;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

pub const TOTAL_LABEL: &str = "Total";
pub const YEAR_LABEL: &str = "Ano";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub category: String,
    pub total: u64,
}

/// `[label, "Total"]` pairs ready for a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountTable {
    pub label: String,
    pub rows: Vec<CountRow>,
}

impl CountTable {
    pub fn grand_total(&self) -> u64 {
        self.rows.iter().map(|r| r.total).sum()
    }

    pub fn categories(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.category.as_str()).collect()
    }

    /// Two columns: the category (named after `label`) and `Total`.
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let schema = Schema::new(vec![
            Field::new(&self.label, DataType::Utf8, false),
            Field::new(TOTAL_LABEL, DataType::UInt64, false),
        ]);
        let categories: StringArray = self.rows.iter().map(|r| Some(r.category.as_str())).collect();
        let totals = UInt64Array::from_iter_values(self.rows.iter().map(|r| r.total));
        RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(categories) as ArrayRef, Arc::new(totals) as ArrayRef],
        )
    }
}

/// One parent/child bucket of a two-level breakdown (municipality → neighborhood).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyCount {
    pub parent: String,
    pub child: String,
    pub total: u64,
}

/// Occurrences of each distinct non-null value in `column`, most frequent first.
///
/// `None` when the column is missing or holds no values. Equal totals are ordered by
/// category so the result does not depend on row order.
pub fn count_by(table: &CaseTable, column: &str, label: &str) -> Option<CountTable> {
    let values = table.text_values(column)?;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for v in values.into_iter().flatten() {
        *counts.entry(v).or_insert(0) += 1;
    }
    if counts.is_empty() {
        return None;
    }

    let mut rows: Vec<CountRow> = counts
        .into_iter()
        .map(|(category, total)| CountRow { category, total })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    Some(CountTable {
        label: label.to_string(),
        rows,
    })
}

/// Cases per `case_year`, labelled `Ano`, in year order.
///
/// Years sort numerically when every label is an integer; one stray label
/// (`"202X"`, `""`) switches the whole table to plain string order.
pub fn count_by_year(table: &CaseTable) -> Option<CountTable> {
    let mut counts = count_by(table, CASE_YEAR, YEAR_LABEL)?;
    sort_years(&mut counts.rows);
    Some(counts)
}

fn sort_years(rows: &mut [CountRow]) {
    let numeric = rows
        .iter()
        .all(|r| r.category.trim().parse::<i64>().is_ok());
    if numeric {
        rows.sort_by_key(|r| r.category.trim().parse::<i64>().unwrap_or(i64::MAX));
    } else {
        rows.sort_by(|a, b| a.category.cmp(&b.category));
    }
}

/// Totals per `(parent, child)` over rows where both are present, ordered by parent then child.
pub fn count_hierarchy(table: &CaseTable, parent: &str, child: &str) -> Option<Vec<HierarchyCount>> {
    let parents = table.text_values(parent)?;
    let children = table.text_values(child)?;

    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
    for (p, c) in parents.into_iter().zip(children) {
        if let (Some(p), Some(c)) = (p, c) {
            *counts.entry((p, c)).or_insert(0) += 1;
        }
    }
    if counts.is_empty() {
        return None;
    }

    Some(
        counts
            .into_iter()
            .map(|((parent, child), total)| HierarchyCount {
                parent,
                child,
                total,
            })
            .collect(),
    )
}
