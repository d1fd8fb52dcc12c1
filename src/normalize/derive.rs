use crate::normalize::date_parser::parse_day_first;
use crate::schema::MONTH_NAMES;
use arrow::array::{Date32Array, Int32Array, StringArray};
use arrow::datatypes::Date32Type;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Characters 11..15 of the case number. Shorter inputs give a shorter (possibly empty) result.
pub fn case_year_of(case_number: &str) -> String {
    case_number.chars().skip(11).take(4).collect()
}

pub fn case_years(case_numbers: Option<&StringArray>, rows: usize) -> StringArray {
    match case_numbers {
        Some(arr) => arr.iter().map(|v| v.map(case_year_of)).collect(),
        None => StringArray::new_null(rows),
    }
}

/// `"Zona Urbana - Inhuma"` → (`Zona Urbana`, `Inhuma`). Without a separator only the zone is set.
pub fn split_location(location: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = location.split('-').map(str::trim).collect();
    let zone = parts.first().map(|p| p.to_string());
    let municipality = if parts.len() >= 2 {
        parts.last().map(|p| p.to_string())
    } else {
        None
    };
    (zone, municipality)
}

pub fn zones_and_municipalities(
    locations: Option<&StringArray>,
    rows: usize,
) -> (StringArray, StringArray) {
    let Some(arr) = locations else {
        return (StringArray::new_null(rows), StringArray::new_null(rows));
    };
    let (zones, municipalities): (Vec<Option<String>>, Vec<Option<String>>) = arr
        .iter()
        .map(|v| v.map(split_location).unwrap_or((None, None)))
        .unzip();
    (StringArray::from(zones), StringArray::from(municipalities))
}

/// Parsed filing dates; unparsable or missing values are `None`.
pub fn filing_dates(raw: Option<&StringArray>, rows: usize) -> Vec<Option<NaiveDate>> {
    let Some(arr) = raw else {
        return vec![None; rows];
    };
    let dates: Vec<Option<NaiveDate>> = arr.iter().map(|v| v.and_then(parse_day_first)).collect();
    let unparsed = arr
        .iter()
        .zip(&dates)
        .filter(|(raw, parsed)| raw.is_some() && parsed.is_none())
        .count();
    if unparsed > 0 {
        debug!(unparsed, "filing dates that could not be parsed");
    }
    dates
}

/// Days since 1970-01-01.
pub fn to_date32(date: NaiveDate) -> i32 {
    Date32Type::from_naive_date(date)
}

/// The calendar columns that hang off `filing_date`.
pub struct MonthColumns {
    pub filing_date: Date32Array,
    pub month_name: StringArray,
    pub year_num: Int32Array,
    pub month_label: StringArray,
    pub month_sort_key: Int32Array,
}

pub fn month_columns(dates: &[Option<NaiveDate>]) -> MonthColumns {
    let filing_date: Date32Array = dates.iter().map(|d| d.map(to_date32)).collect();
    let month_name: StringArray = dates
        .iter()
        .map(|d| d.map(|d| MONTH_NAMES[d.month0() as usize]))
        .collect();
    let year_num: Int32Array = dates.iter().map(|d| d.map(|d| d.year())).collect();
    let month_label: StringArray = dates
        .iter()
        .map(|d| d.map(|d| format!("{}/{}", MONTH_NAMES[d.month0() as usize], d.year())))
        .collect();
    let month_sort_key: Int32Array = dates.iter().map(|d| d.map(|d| d.month() as i32)).collect();

    MonthColumns {
        filing_date,
        month_name,
        year_num,
        month_label,
        month_sort_key,
    }
}
