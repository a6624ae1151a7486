use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single field value of a result record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// Case-folded string form used for facet values and filter matching.
    pub fn filter_key(&self) -> String {
        self.to_string().to_lowercase()
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral numbers print without a fractional part ("3", not "3.0").
            FieldValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// One job run as delivered by the backend: a flat key/value record.
///
/// `null` fields are dropped on the way in; nested arrays and objects are kept
/// as their JSON text so they can still be displayed and compared.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    from = "serde_json::Map<String, serde_json::Value>",
    into = "BTreeMap<String, FieldValue>"
)]
pub struct ResultItem {
    fields: BTreeMap<String, FieldValue>,
}

impl ResultItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Display text for a field, empty when absent.
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(ToString::to_string).unwrap_or_default()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for ResultItem {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        use serde_json::Value;

        let fields = map
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::Null => return None,
                    Value::Bool(b) => FieldValue::Bool(b),
                    Value::Number(n) => FieldValue::Number(n.as_f64()?),
                    Value::String(s) => FieldValue::Text(s),
                    nested @ (Value::Array(_) | Value::Object(_)) => {
                        FieldValue::Text(nested.to_string())
                    }
                };
                Some((key, value))
            })
            .collect();
        Self { fields }
    }
}

impl From<ResultItem> for BTreeMap<String, FieldValue> {
    fn from(item: ResultItem) -> Self {
        item.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_nulls_are_dropped_and_nested_values_kept_as_text() {
        let item: ResultItem = serde_json::from_str(
            r#"{"uuid":"a1","workers":24,"status":null,"tags":["x","y"],"fips":false}"#,
        )
        .unwrap();

        assert_eq!(item.get("status"), None);
        assert_eq!(item.text("workers"), "24");
        assert_eq!(item.text("tags"), r#"["x","y"]"#);
        assert_eq!(item.get("fips"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn filter_key_is_case_folded() {
        assert_eq!(FieldValue::from("AWS").filter_key(), "aws");
        assert_eq!(FieldValue::from(2.5).filter_key(), "2.5");
    }
}
