// src/schema/columns.rs

pub const CASE_NUMBER: &str = "case_number";
pub const TAGS: &str = "tags";
pub const PRIORITIES: &str = "priorities";
pub const FILING_DATE_RAW: &str = "filing_date_raw";
pub const OCCURRENCE_LOCATION: &str = "occurrence_location";
pub const NEIGHBORHOOD: &str = "neighborhood";

pub const CASE_YEAR: &str = "case_year";
pub const FILING_DATE: &str = "filing_date";
pub const MONTH_NAME: &str = "month_name";
pub const YEAR_NUM: &str = "year_num";
pub const MONTH_LABEL: &str = "month_label";
pub const MONTH_SORT_KEY: &str = "month_sort_key";
pub const ZONE: &str = "zone";
pub const MUNICIPALITY: &str = "municipality";

/// Canonical name → accepted spellings in the source spreadsheet, tried in order.
pub static COLUMN_ALIASES: &[(&str, &[&str])] = &[
    (
        CASE_NUMBER,
        &[
            "case_number",
            "nr_processo",
            "numero do processo",
            "nº do processo",
            "nro_processo",
        ],
    ),
    (TAGS, &["tags", "etiquetas", "etiqueta"]),
    (PRIORITIES, &["priorities", "prioridades", "prioridade"]),
    (
        FILING_DATE_RAW,
        &[
            "filing_date_raw",
            "dt_distribuicao",
            "data de distribuicao",
            "data autuacao",
            "data de autuacao",
        ],
    ),
    (
        OCCURRENCE_LOCATION,
        &[
            "occurrence_location",
            "local_ocorrencia",
            "local ocorrencia",
            "local de ocorrencia",
        ],
    ),
    (
        NEIGHBORHOOD,
        &[
            "neighborhood",
            "bairro_localidade",
            "bairro localidade",
            "bairro",
            "localidade",
            "bairro/localidade",
        ],
    ),
];

/// Columns that get trimmed and have "nan"/"None" coerced to null after derivation.
pub const CLEANED_COLUMNS: &[&str] = &[
    TAGS,
    PRIORITIES,
    OCCURRENCE_LOCATION,
    NEIGHBORHOOD,
    ZONE,
    MUNICIPALITY,
    MONTH_LABEL,
    CASE_YEAR,
    MONTH_NAME,
];

/// Columns shown in the case list, in display order.
pub const SUMMARY_COLUMNS: &[&str] = &[
    MONTH_LABEL,
    FILING_DATE,
    CASE_YEAR,
    PRIORITIES,
    ZONE,
    MUNICIPALITY,
    NEIGHBORHOOD,
    OCCURRENCE_LOCATION,
];

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// 1-based month number for a month name, if it is one of [`MONTH_NAMES`].
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}
