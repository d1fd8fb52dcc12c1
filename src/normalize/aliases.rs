use crate::schema::COLUMN_ALIASES;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Lowercase, accent-free (NFKD, non-ASCII dropped), single-spaced, trimmed.
pub fn norm_text(s: &str) -> String {
    let ascii: String = s.nfkd().filter(char::is_ascii).collect();
    WHITESPACE
        .replace_all(&ascii, " ")
        .trim()
        .to_lowercase()
}

/// Matching key for headers and aliases: `_` and space are interchangeable.
pub fn header_key(s: &str) -> String {
    norm_text(&s.replace('_', " "))
}

/// Rename raw headers onto canonical column names.
///
/// For each canonical column, its aliases are tried in order and the first one matching an
/// unclaimed header wins. A canonical name already present verbatim is left alone.
pub fn rename_columns(headers: &[String]) -> Vec<String> {
    let keys: Vec<String> = headers.iter().map(|h| header_key(h)).collect();
    let mut renamed = headers.to_vec();
    let mut claimed = vec![false; headers.len()];

    for (canonical, aliases) in COLUMN_ALIASES {
        if headers.iter().any(|h| h == canonical) {
            continue;
        }
        let hit = aliases.iter().find_map(|alias| {
            let key = header_key(alias);
            (0..keys.len()).find(|&idx| !claimed[idx] && keys[idx] == key)
        });
        if let Some(idx) = hit {
            debug!(from = %headers[idx], to = %canonical, "mapped column");
            renamed[idx] = canonical.to_string();
            claimed[idx] = true;
        }
    }

    renamed
}
