//! Tagged value tree shared by front matter, the global context and the
//! template engine.
//!
//! YAML documents are converted into [`Value`] once, right after parsing.
//! The template engine only ever sees a `Value` through its `Serialize` impl,
//! so there is exactly one bridge between data files and templates.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// String-keyed mapping, ordered by key for deterministic output.
pub type Mapping = BTreeMap<String, Value>;

/// Format used when a date is handed to templates.
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    String(String),
    /// YAML timestamp without a time part (`2024-01-31`).
    Date(NaiveDate),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Render a scalar as plain text. Collections yield `None`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Unsigned(n) => Some(n.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
            Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }
}

// ============================================================================
// YAML Conversion
// ============================================================================

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Self::Null,
            Yaml::Bool(b) => Self::Bool(b),
            Yaml::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Self::Integer(i),
                (None, Some(u)) => Self::Unsigned(u),
                (None, None) => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Yaml::String(s) => match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
                Ok(date) if s.len() == 10 => Self::Date(date),
                _ => Self::String(s),
            },
            Yaml::Sequence(seq) => Self::Sequence(seq.into_iter().map(Self::from).collect()),
            Yaml::Mapping(map) => Self::Mapping(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), Self::from(v)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

/// Mapping keys in YAML can be any scalar; templates need strings.
fn yaml_key(key: serde_yaml::Value) -> String {
    match Value::from(key) {
        Value::Null => "null".to_owned(),
        other => other.to_text().unwrap_or_default(),
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Template Bridge
// ============================================================================

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Unsigned(n) => serializer.serialize_u64(*n),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            Self::Sequence(seq) => serializer.collect_seq(seq),
            Self::Mapping(map) => serializer.collect_map(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(src: &str) -> Value {
        Value::from(serde_yaml::from_str::<serde_yaml::Value>(src).unwrap())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(yaml("42"), Value::Integer(42));
        assert_eq!(yaml("1.5"), Value::Float(1.5));
        assert_eq!(yaml("true"), Value::Bool(true));
        assert_eq!(yaml("~"), Value::Null);
        assert_eq!(yaml("hello"), Value::String("hello".into()));
    }

    #[test]
    fn test_large_unsigned_integer_is_exact() {
        let value = yaml("18446744073709551615");
        assert_eq!(value, Value::Unsigned(u64::MAX));
        assert_eq!(value.to_text().as_deref(), Some("18446744073709551615"));
        assert_eq!(serde_json::to_value(&value).unwrap(), u64::MAX);
        assert_eq!(yaml("-1"), Value::Integer(-1));
    }

    #[test]
    fn test_iso_date_becomes_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(yaml("2024-01-31"), Value::Date(expected));
        // day.month.year stays a string; the blog index parses it
        assert_eq!(yaml("31.1.2024"), Value::String("31.1.2024".into()));
    }

    #[test]
    fn test_nested_mapping_and_keys() {
        let value = yaml("site:\n  tags: [a, b]\n1: one\n");
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get("1"), Some(&Value::String("one".into())));

        let site = map.get("site").and_then(Value::as_mapping).unwrap();
        assert_eq!(
            site.get("tags"),
            Some(&Value::Sequence(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_serialize_to_json() {
        let value = yaml("title: Hi\ndate: 2024-01-31\ncount: 3\n");
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["title"], "Hi");
        assert_eq!(json["date"], "2024-01-31");
        assert_eq!(json["count"], 3);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Value::Integer(7).to_text().as_deref(), Some("7"));
        assert_eq!(Value::Null.to_text(), None);
        assert_eq!(Value::Sequence(vec![]).to_text(), None);
    }
}
