//! Part Specification Values
//!
//! Vendor data for parts is loosely typed: the same key may hold a number in one
//! listing and a string with a unit in another. `SpecValue` captures whatever the
//! JSON held and `Specifications` exposes getters that never fail, degrading to an
//! absent or empty result instead.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single specification value as found in part data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<SpecValue>),
    Object(BTreeMap<String, SpecValue>),
}

static EMPTY_OBJECT: BTreeMap<String, SpecValue> = BTreeMap::new();

impl SpecValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SpecValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric view of the value. Strings are accepted when they start with a
    /// number, so `"350mm"` and `"750 W"` both read as numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SpecValue::Number(n) if n.is_finite() => Some(*n),
            SpecValue::String(s) => parse_leading_number(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SpecValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SpecValue::Null)
    }
}

impl From<&str> for SpecValue {
    fn from(value: &str) -> Self {
        SpecValue::String(value.to_string())
    }
}

impl From<String> for SpecValue {
    fn from(value: String) -> Self {
        SpecValue::String(value)
    }
}

impl From<f64> for SpecValue {
    fn from(value: f64) -> Self {
        SpecValue::Number(value)
    }
}

impl From<i64> for SpecValue {
    fn from(value: i64) -> Self {
        SpecValue::Number(value as f64)
    }
}

impl From<bool> for SpecValue {
    fn from(value: bool) -> Self {
        SpecValue::Bool(value)
    }
}

impl<T: Into<SpecValue>> From<Vec<T>> for SpecValue {
    fn from(values: Vec<T>) -> Self {
        SpecValue::Array(values.into_iter().map(Into::into).collect())
    }
}

fn parse_leading_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Free-form specification map of a part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Specifications(BTreeMap<String, SpecValue>);

impl Specifications {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SpecValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SpecValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpecValue)> {
        self.0.iter()
    }

    /// Raw value for `key`. An explicit `null` reads the same as a missing key.
    pub fn get_value(&self, key: &str) -> Option<&SpecValue> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Array value for `key`; a scalar string is wrapped as a one-element list,
    /// anything else yields an empty list.
    pub fn get_array(&self, key: &str) -> Vec<&SpecValue> {
        match self.get_value(key) {
            Some(SpecValue::Array(items)) => items.iter().collect(),
            Some(value @ SpecValue::String(_)) => vec![value],
            _ => Vec::new(),
        }
    }

    /// Object value for `key`, or an empty map.
    pub fn get_object(&self, key: &str) -> &BTreeMap<String, SpecValue> {
        match self.get_value(key) {
            Some(SpecValue::Object(map)) => map,
            _ => &EMPTY_OBJECT,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get_value(key).and_then(SpecValue::as_str)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get_value(key).and_then(SpecValue::as_number)
    }

    pub fn get_number_or(&self, key: &str, default: f64) -> f64 {
        self.get_number(key).unwrap_or(default)
    }

    /// String entries of the array at `key`; non-string entries are skipped.
    pub fn get_strings(&self, key: &str) -> Vec<&str> {
        self.get_array(key)
            .into_iter()
            .filter_map(SpecValue::as_str)
            .collect()
    }
}

impl FromIterator<(String, SpecValue)> for Specifications {
    fn from_iter<I: IntoIterator<Item = (String, SpecValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Specifications {
        serde_json::from_str(
            r#"{
                "socket": "AM5",
                "memoryType": ["DDR5"],
                "maxMemory": 192,
                "length": "336mm",
                "connectors": {"24pin": 1, "6+2pin": 4},
                "broken": null,
                "modular": true
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_get_value_missing_and_null() {
        let specs = sample();
        assert!(specs.get_value("nope").is_none());
        assert!(specs.get_value("broken").is_none());
        assert_eq!(specs.get_value("modular").and_then(SpecValue::as_bool), Some(true));
    }

    #[test]
    fn test_get_array_wraps_scalar_string() {
        let specs = sample();
        assert_eq!(specs.get_strings("memoryType"), vec!["DDR5"]);
        assert_eq!(specs.get_strings("socket"), vec!["AM5"]);
        assert!(specs.get_array("maxMemory").is_empty());
        assert!(specs.get_array("connectors").is_empty());
    }

    #[test]
    fn test_get_object_degrades_to_empty() {
        let specs = sample();
        assert_eq!(specs.get_object("connectors").len(), 2);
        assert!(specs.get_object("socket").is_empty());
        assert!(specs.get_object("missing").is_empty());
    }

    #[test]
    fn test_numbers_from_strings() {
        let specs = sample();
        assert_eq!(specs.get_number("maxMemory"), Some(192.0));
        assert_eq!(specs.get_number("length"), Some(336.0));
        assert_eq!(specs.get_number("socket"), None);
        assert_eq!(specs.get_number_or("missing", 128.0), 128.0);
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("750 W"), Some(750.0));
        assert_eq!(parse_leading_number("  3.5in"), Some(3.5));
        assert_eq!(parse_leading_number("-12V"), Some(-12.0));
        assert_eq!(parse_leading_number("ATX"), None);
        assert_eq!(parse_leading_number(""), None);
    }
}
