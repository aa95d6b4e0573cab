// Record normalization: raw nested exports → flat, typed, null-free entities.
// This module is the single owner of the "no information" sentinel policy.

pub mod candidate;
pub mod dataset;
pub mod handlers;
pub mod job;
pub mod prospect;
pub mod raw;
pub mod sanitize;
pub mod values;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

use self::values::{canonical_key, clean_text, date_or_epoch, is_date_key};

/// Placeholder substituted for any missing, empty or unparseable text field.
pub const NO_INFORMATION: &str = "sem informacao";

/// Fixed fallback for invalid or missing dates.
pub fn epoch_sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// A normalized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    /// A JSON number, kept alongside its rendered text.
    Number(f64, String),
}

/// A flattened source record after key renames, date coercion and sentinel
/// substitution. Lookups for keys the source omitted return the sentinels.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl NormalizedRecord {
    /// Builds a record from attribute groups merged in order; later groups win
    /// on key collisions.
    pub fn from_groups<'a, I>(groups: I) -> Self
    where
        I: IntoIterator<Item = &'a serde_json::Map<String, Value>>,
    {
        let mut record = Self::default();
        for group in groups {
            for (key, value) in group {
                record.insert(key, value);
            }
        }
        record
    }

    pub fn insert(&mut self, key: &str, value: &Value) {
        let key = canonical_key(key);
        let field = if is_date_key(&key) {
            FieldValue::Date(date_or_epoch(value))
        } else if let Some(number) = value.as_f64() {
            FieldValue::Number(number, clean_text(value))
        } else {
            FieldValue::Text(clean_text(value))
        };
        self.fields.insert(key, field);
    }

    pub fn text(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(FieldValue::Text(text)) | Some(FieldValue::Number(_, text)) => text.clone(),
            Some(FieldValue::Date(date)) => date.format("%Y-%m-%d").to_string(),
            None => NO_INFORMATION.to_string(),
        }
    }

    /// Monetary amount: JSON numbers as-is, strings in Brazilian notation.
    pub fn money(&self, key: &str) -> Option<f64> {
        match self.fields.get(key) {
            Some(FieldValue::Number(amount, _)) => Some(*amount),
            Some(FieldValue::Text(text)) => values::parse_money(text),
            _ => None,
        }
    }

    pub fn date(&self, key: &str) -> NaiveDate {
        match self.fields.get(key) {
            Some(FieldValue::Date(date)) => *date,
            Some(FieldValue::Text(text)) | Some(FieldValue::Number(_, text)) => {
                values::parse_date(text).unwrap_or_else(epoch_sentinel)
            }
            None => epoch_sentinel(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}
