//! Scalar coercion rules shared by every entity normalizer.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::sanitize::sanitize_text;
use super::{epoch_sentinel, NO_INFORMATION};

/// Raw values that carry no information in the source exports.
const PLACEHOLDERS: &[&str] = &["", ":", "-"];

/// Key tokens that mark a field as a date.
const DATE_MARKERS: &[&str] = &["data", "date", "dt"];

/// Date fields whose names carry no date marker.
const EXTRA_DATE_FIELDS: &[&str] = &["limite_esperado_para_contratacao", "ultima_atualizacao"];

/// Misspelled keys found in the source exports and their canonical names.
const KEY_RENAMES: &[(&str, &str)] = &[
    ("nivel profissional", "nivel_profissional"),
    ("data_requicisao", "data_requisicao"),
    ("situacao_candidado", "situacao_candidato"),
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

pub fn canonical_key(key: &str) -> String {
    let trimmed = key.trim();
    KEY_RENAMES
        .iter()
        .find(|(from, _)| *from == trimmed)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

pub fn is_date_key(key: &str) -> bool {
    let key = key.to_lowercase();
    EXTRA_DATE_FIELDS.contains(&key.as_str())
        || key
            .split(|c: char| c == '_' || c == ' ' || c == '-')
            .any(|token| DATE_MARKERS.contains(&token))
}

pub fn is_placeholder(text: &str) -> bool {
    PLACEHOLDERS.contains(&text.trim())
}

/// True when a normalized text value carries real data.
pub fn has_information(text: &str) -> bool {
    !is_placeholder(text) && text != NO_INFORMATION
}

/// Renders a raw JSON value as text. Nulls become empty strings, arrays are
/// joined with commas.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Sanitizes a raw value and substitutes the sentinel for placeholders.
pub fn clean_text(value: &Value) -> String {
    let text = sanitize_text(&value_to_text(value));
    if is_placeholder(&text) {
        NO_INFORMATION.to_string()
    } else {
        text
    }
}

/// Parses a date in any accepted source format. Dates before the epoch
/// sentinel are rejected.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })?;

    (date >= epoch_sentinel()).then_some(date)
}

pub fn date_or_epoch(value: &Value) -> NaiveDate {
    parse_date(&value_to_text(value)).unwrap_or_else(epoch_sentinel)
}

/// Parses a Brazilian-formatted monetary amount such as `"R$ 1.234,56"`.
pub fn parse_money(text: &str) -> Option<f64> {
    let cleaned: String = text
        .replace("R$", "")
        .replace('$', "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = cleaned.replace('.', "").replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}
