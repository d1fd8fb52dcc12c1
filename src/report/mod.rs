// src/report/mod.rs
pub mod export;

use crate::aggregate::{count_by, count_by_year, count_hierarchy, CountTable, HierarchyCount};
use crate::filter::{FilterOptions, FilterSelection};
use crate::normalize::CaseTable;
use crate::schema::columns::*;
use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use serde::Serialize;
use std::{fs, path::Path};
use tracing::info;

pub use export::write_summary;

/// Everything the dashboard page needs for one filter state.
///
/// Chart slots are `None` when the filtered rows have nothing to show there.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub total_cases: usize,
    pub priorities: Option<CountTable>,
    pub municipalities: Option<CountTable>,
    pub zones: Option<CountTable>,
    pub municipality_neighborhoods: Option<Vec<HierarchyCount>>,
    pub years: Option<CountTable>,
    pub selection: FilterSelection,
    pub filter_options: FilterOptions,
    pub summary_columns: Vec<String>,
}

impl DashboardReport {
    /// Options come from the full table; counts from the rows `selection` keeps.
    pub fn build(table: &CaseTable, selection: &FilterSelection) -> Result<Self> {
        let filtered = selection
            .apply(table)
            .context("applying filter selection")?;
        info!(
            total = table.num_rows(),
            kept = filtered.num_rows(),
            "building dashboard report"
        );

        Ok(Self {
            total_cases: filtered.num_rows(),
            priorities: count_by(&filtered, PRIORITIES, "Prioridade"),
            municipalities: count_by(&filtered, MUNICIPALITY, "Município"),
            zones: count_by(&filtered, ZONE, "Zona"),
            municipality_neighborhoods: count_hierarchy(&filtered, MUNICIPALITY, NEIGHBORHOOD),
            years: count_by_year(&filtered),
            selection: selection.clone(),
            filter_options: FilterOptions::compute(table, selection),
            summary_columns: SUMMARY_COLUMNS
                .iter()
                .filter(|c| filtered.has_column(c))
                .map(|c| c.to_string())
                .collect(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing dashboard report")
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .with_context(|| format!("writing report to {}", path.display()))
    }
}

/// The case list columns, for the rows `selection` keeps.
pub fn summary_table(table: &CaseTable, selection: &FilterSelection) -> Result<RecordBatch> {
    let filtered = selection
        .apply(table)
        .context("applying filter selection")?;
    filtered
        .project(SUMMARY_COLUMNS)
        .context("projecting summary columns")
}
