// ── Data model ──
//
// `Mapping` / `FieldValue` are what callers work with; `WireRecord` is the
// vendor's `paintArray` of `paintKeyValuePair`s, where every leaf is a string
// and a value is either `str` or a nested `arr`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Generic key/value structure used at the public API boundary.
pub type Mapping = BTreeMap<String, FieldValue>;

/// The raw reply handed back by a transport, before decoding.
///
/// A well-formed reply is a serialized [`WireRecord`]; anything else decodes
/// to "no result".
pub type RawReply = serde_json::Value;

/// A single value inside a [`Mapping`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Map(Mapping),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Canonical text form: text verbatim, scalars via their `Display`, nested
/// mappings as compact JSON.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Map(m) => {
                let json = serde_json::to_string(m).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        Self::Int(i.into())
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Mapping> for FieldValue {
    fn from(m: Mapping) -> Self {
        Self::Map(m)
    }
}

// ── Wire representation ─────────────────────────────────────────────

/// The vendor's `paintArray`: an ordered list of key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    pub pairs: Vec<WirePair>,
}

impl WireRecord {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.pairs.iter().find(|p| p.key == key).map(|p| &p.value)
    }
}

/// The vendor's `paintKeyValuePair`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePair {
    pub key: String,
    pub value: WireValue,
}

/// Value half of a wire pair: a string leaf or a nested array.
///
/// `Arr(None)` is a present-but-empty nested array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawWireValue", into = "RawWireValue")]
pub enum WireValue {
    Str(String),
    Arr(Option<WireRecord>),
}

/// On the wire both slots are always present and at most one is non-null.
#[derive(Serialize, Deserialize)]
struct RawWireValue {
    #[serde(default)]
    str: Option<String>,
    #[serde(default)]
    arr: Option<WireRecord>,
}

impl From<RawWireValue> for WireValue {
    fn from(raw: RawWireValue) -> Self {
        match raw.str {
            Some(s) => Self::Str(s),
            None => Self::Arr(raw.arr),
        }
    }
}

impl From<WireValue> for RawWireValue {
    fn from(value: WireValue) -> Self {
        match value {
            WireValue::Str(s) => Self {
                str: Some(s),
                arr: None,
            },
            WireValue::Arr(arr) => Self { str: None, arr },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_value_serializes_both_slots() {
        let value = WireValue::Str("abc".into());
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({ "str": "abc", "arr": null })
        );
        let empty = WireValue::Arr(None);
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            json!({ "str": null, "arr": null })
        );
    }

    #[test]
    fn wire_value_without_string_is_an_array() {
        let value: WireValue = serde_json::from_value(json!({})).unwrap();
        assert_eq!(value, WireValue::Arr(None));
    }

    #[test]
    fn field_values_from_json() {
        let mapping: Mapping = serde_json::from_value(json!({
            "name": "Ada",
            "age": 36,
            "score": 1.5,
            "active": true,
            "extra": { "city": "London" }
        }))
        .unwrap();
        assert_eq!(mapping["name"], FieldValue::Text("Ada".into()));
        assert_eq!(mapping["age"], FieldValue::Int(36));
        assert_eq!(mapping["score"], FieldValue::Float(1.5));
        assert_eq!(mapping["active"], FieldValue::Bool(true));
        assert_eq!(
            mapping["extra"].as_map().unwrap()["city"],
            FieldValue::Text("London".into())
        );
    }

    #[test]
    fn canonical_text_forms() {
        assert_eq!(FieldValue::Int(42).to_string(), "42");
        assert_eq!(FieldValue::Float(1.5).to_string(), "1.5");
        assert_eq!(FieldValue::Bool(false).to_string(), "false");
        let nested = Mapping::from([("a".to_owned(), FieldValue::Int(1))]);
        assert_eq!(FieldValue::Map(nested).to_string(), r#"{"a":1}"#);
    }
}
