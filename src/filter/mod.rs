// src/filter/mod.rs

use crate::normalize::CaseTable;
use crate::schema::columns::*;
use crate::schema::month_number;
use anyhow::{Context, Result};
use arrow::{array::BooleanArray, error::ArrowError};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeSet, HashSet},
    fs::File,
    path::Path,
};
use tracing::debug;

/// Selected values per filterable column. An empty list means "no filter".
///
/// Reads from YAML such as:
///
/// ```yaml
/// case_year: ["2022", "2023"]
/// municipality: [Inhuma]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub case_year: Vec<String>,
    pub month_label: Vec<String>,
    pub priorities: Vec<String>,
    pub municipality: Vec<String>,
    pub neighborhood: Vec<String>,
    pub zone: Vec<String>,
}

impl FilterSelection {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("opening filter file {:?}", path))?;
        serde_yaml::from_reader(f).with_context(|| format!("parsing filter file {:?}", path))
    }

    pub fn is_empty(&self) -> bool {
        self.by_column().iter().all(|(_, values)| values.is_empty())
    }

    /// Add `other`'s values, skipping ones already selected.
    pub fn merge(&mut self, other: FilterSelection) {
        fn extend(into: &mut Vec<String>, from: Vec<String>) {
            for v in from {
                if !into.contains(&v) {
                    into.push(v);
                }
            }
        }
        extend(&mut self.case_year, other.case_year);
        extend(&mut self.month_label, other.month_label);
        extend(&mut self.priorities, other.priorities);
        extend(&mut self.municipality, other.municipality);
        extend(&mut self.neighborhood, other.neighborhood);
        extend(&mut self.zone, other.zone);
    }

    fn by_column(&self) -> [(&'static str, &[String]); 6] {
        [
            (CASE_YEAR, self.case_year.as_slice()),
            (MONTH_LABEL, self.month_label.as_slice()),
            (PRIORITIES, self.priorities.as_slice()),
            (MUNICIPALITY, self.municipality.as_slice()),
            (NEIGHBORHOOD, self.neighborhood.as_slice()),
            (ZONE, self.zone.as_slice()),
        ]
    }

    /// Rows matching every non-empty selection whose column exists.
    /// Within a column any selected value matches; nulls never do.
    pub fn apply(&self, table: &CaseTable) -> Result<CaseTable, ArrowError> {
        let mut keep = vec![true; table.num_rows()];
        for (column, selected) in self.by_column() {
            if selected.is_empty() {
                continue;
            }
            let Some(values) = table.text_values(column) else {
                debug!(column, "filter column absent; selection ignored");
                continue;
            };
            let wanted: HashSet<&str> = selected.iter().map(String::as_str).collect();
            for (k, v) in keep.iter_mut().zip(&values) {
                *k = *k && v.as_deref().is_some_and(|v| wanted.contains(v));
            }
        }
        table.filter(&BooleanArray::from(keep))
    }
}

/// Choices offered for each filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub case_year: Vec<String>,
    /// Chronological: by year, then month.
    pub month_label: Vec<String>,
    pub priorities: Vec<String>,
    pub municipality: Vec<String>,
    /// Limited to the selected municipalities, when any are selected.
    pub neighborhood: Vec<String>,
    pub zone: Vec<String>,
}

impl FilterOptions {
    pub fn compute(table: &CaseTable, selection: &FilterSelection) -> Self {
        let mut month_label = distinct_sorted(table, MONTH_LABEL, None);
        month_label.sort_by_key(|label| month_label_key(label));

        let in_municipalities = if selection.municipality.is_empty() {
            None
        } else {
            table.text_values(MUNICIPALITY).map(|values| {
                values
                    .iter()
                    .map(|v| {
                        v.as_ref()
                            .is_some_and(|m| selection.municipality.contains(m))
                    })
                    .collect::<Vec<bool>>()
            })
        };

        Self {
            case_year: distinct_sorted(table, CASE_YEAR, None),
            month_label,
            priorities: distinct_sorted(table, PRIORITIES, None),
            municipality: distinct_sorted(table, MUNICIPALITY, None),
            neighborhood: distinct_sorted(table, NEIGHBORHOOD, in_municipalities.as_deref()),
            zone: distinct_sorted(table, ZONE, None),
        }
    }
}

/// Sorted distinct non-null values of `column`, optionally only from rows where `rows` is true.
fn distinct_sorted(table: &CaseTable, column: &str, rows: Option<&[bool]>) -> Vec<String> {
    let Some(values) = table.text_values(column) else {
        return Vec::new();
    };
    values
        .into_iter()
        .enumerate()
        .filter(|(i, _)| rows.map_or(true, |r| r.get(*i).copied().unwrap_or(false)))
        .filter_map(|(_, v)| v)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// `"Março/2022"` → `(2022, 3)`. Labels that don't parse sort last.
fn month_label_key(label: &str) -> (i32, u32) {
    let parsed = label.split_once('/').and_then(|(month, year)| {
        Some((year.trim().parse::<i32>().ok()?, month_number(month.trim())?))
    });
    parsed.unwrap_or((i32::MAX, u32::MAX))
}
