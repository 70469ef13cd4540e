// ── Structured codec ──
//
// Mapping <-> paintArray conversion. Text the transport cannot carry intact
// is shipped base64-encoded under a `_base64` suffixed key. Decoding is
// deliberately not suffix-aware: replies are copied verbatim and callers use
// `text_field` where they know a field may come back wrapped.

use std::collections::BTreeSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::warn;

use crate::bean::fields;
use crate::wire::{FieldValue, Mapping, RawReply, WirePair, WireRecord, WireValue};

/// Suffix appended to a key whose value has been base64-encoded.
///
/// Distinct input keys can land on the same wire key: `name` with a wrapped
/// value next to a literal `name_base64`, or keys that are all non-ASCII
/// (stripped to `""`). Both pairs are still sent; see [`colliding_keys`].
pub const BASE64_SUFFIX: &str = "_base64";

/// Identifier keys the vendor always treats as plain text.
const PLAIN_TEXT_KEYS: &[&str] = &[fields::BEAN_ID, fields::MESSAGE_ID, fields::LIST_ID];

/// `true` when every byte is printable ASCII (`0x20..=0x7E`).
pub fn is_ascii_safe(text: &str) -> bool {
    text.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Encode a mapping as a wire record.
///
/// An empty mapping encodes to `None`, the transport's "no value" sentinel.
pub fn encode(mapping: &Mapping) -> Option<WireRecord> {
    if mapping.is_empty() {
        return None;
    }

    let pairs: Vec<WirePair> = mapping
        .iter()
        .map(|(key, value)| encode_pair(key, value))
        .collect();

    let collisions = colliding_keys(&pairs);
    if !collisions.is_empty() {
        warn!(keys = ?collisions, "distinct fields encode to the same wire key");
    }

    Some(WireRecord { pairs })
}

/// Wire keys that occur more than once in `pairs`, in first-repeat order.
pub fn colliding_keys(pairs: &[WirePair]) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    let mut repeated = Vec::new();
    for pair in pairs {
        let key = pair.key.as_str();
        if !seen.insert(key) && !repeated.contains(&key) {
            repeated.push(key);
        }
    }
    repeated
}

fn encode_pair(key: &str, value: &FieldValue) -> WirePair {
    let key: String = key.chars().filter(char::is_ascii).collect();

    match value {
        FieldValue::Map(nested) => WirePair {
            key,
            value: WireValue::Arr(encode(nested)),
        },
        FieldValue::Text(text) if is_ascii_safe(text) || PLAIN_TEXT_KEYS.contains(&key.as_str()) => {
            WirePair {
                key,
                value: WireValue::Str(text.clone()),
            }
        }
        FieldValue::Text(text) => WirePair {
            key: format!("{key}{BASE64_SUFFIX}"),
            value: WireValue::Str(STANDARD.encode(text.as_bytes())),
        },
        scalar => WirePair {
            key,
            value: WireValue::Str(scalar.to_string()),
        },
    }
}

/// Decode a wire record back into a mapping.
///
/// `None` (the "no value" sentinel) decodes to an empty mapping. String
/// leaves are copied verbatim, `_base64` keys included.
pub fn decode(record: Option<&WireRecord>) -> Mapping {
    let Some(record) = record else {
        return Mapping::new();
    };

    record
        .pairs
        .iter()
        .map(|pair| {
            let value = match &pair.value {
                WireValue::Str(s) => FieldValue::Text(s.clone()),
                WireValue::Arr(nested) => FieldValue::Map(decode(nested.as_ref())),
            };
            (pair.key.clone(), value)
        })
        .collect()
}

/// Decode a raw transport reply.
///
/// Returns `None` when the reply does not have the `pairs` list structure;
/// malformed replies are absent data, not errors.
pub fn decode_reply(raw: RawReply) -> Option<Mapping> {
    let record: WireRecord = serde_json::from_value(raw).ok()?;
    Some(decode(Some(&record)))
}

/// Read a text field that may have been sent back base64-wrapped.
///
/// Prefers the plain `key`; falls back to `key_base64`, decoding it. A
/// wrapped value that is not valid base64 or UTF-8 yields `None`.
pub fn text_field(mapping: &Mapping, key: &str) -> Option<String> {
    if let Some(value) = mapping.get(key).and_then(FieldValue::as_text) {
        return Some(value.to_owned());
    }

    let wrapped = mapping
        .get(&format!("{key}{BASE64_SUFFIX}"))
        .and_then(FieldValue::as_text)?;
    let bytes = STANDARD.decode(wrapped).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn mapping(value: serde_json::Value) -> Mapping {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn ascii_text_round_trips() {
        let m = mapping(json!({
            "listName": "Newsletter subscribers",
            "nested": { "a": "1", "b": { "c": "deep" } },
            "empty": {}
        }));
        assert_eq!(decode(encode(&m).as_ref()), m);
    }

    #[test]
    fn non_ascii_text_is_base64_wrapped() {
        let record = encode(&mapping(json!({ "name": "café" }))).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.pairs[0].key, "name_base64");
        let WireValue::Str(encoded) = &record.pairs[0].value else {
            panic!("expected a string leaf");
        };
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, "café");
    }

    #[test]
    fn control_characters_are_not_ascii_safe() {
        assert!(is_ascii_safe("plain text, with punctuation!"));
        assert!(!is_ascii_safe("two\nlines"));
        assert!(!is_ascii_safe("tab\tseparated"));
        assert!(!is_ascii_safe("naïve"));
    }

    #[test]
    fn identifier_keys_stay_plain() {
        let record = encode(&mapping(json!({ "messageId": "42", "listId": "ü-7" }))).unwrap();
        assert_eq!(record.get("messageId"), Some(&WireValue::Str("42".into())));
        assert_eq!(record.get("listId"), Some(&WireValue::Str("ü-7".into())));
        assert!(record.get("listId_base64").is_none());
    }

    #[test]
    fn scalars_use_canonical_text() {
        let record = encode(&mapping(json!({ "count": 3, "ratio": 0.25, "flag": true }))).unwrap();
        assert_eq!(record.get("count"), Some(&WireValue::Str("3".into())));
        assert_eq!(record.get("ratio"), Some(&WireValue::Str("0.25".into())));
        assert_eq!(record.get("flag"), Some(&WireValue::Str("true".into())));
    }

    #[test]
    fn empty_mapping_is_the_absent_sentinel() {
        assert_eq!(encode(&Mapping::new()), None);
        assert_eq!(decode(None), Mapping::new());
    }

    #[test]
    fn empty_nested_mapping_is_an_empty_array() {
        let record = encode(&mapping(json!({ "customData": {} }))).unwrap();
        assert_eq!(record.get("customData"), Some(&WireValue::Arr(None)));
    }

    #[test]
    fn non_ascii_keys_are_stripped_to_ascii() {
        let record = encode(&mapping(json!({ "prénom": "Zoe" }))).unwrap();
        assert_eq!(record.pairs[0].key, "prnom");
    }

    #[test]
    fn wrapped_key_can_collide_with_a_literal_one() {
        let record = encode(&mapping(json!({ "name": "café", "name_base64": "plain" }))).unwrap();
        let keys: Vec<&str> = record.pairs.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["name_base64", "name_base64"]);
        assert_eq!(colliding_keys(&record.pairs), vec!["name_base64"]);
    }

    #[test]
    fn all_non_ascii_keys_collide_on_the_empty_key() {
        let record = encode(&mapping(json!({ "名前": "a", "ключ": "b", "ok": "c" }))).unwrap();
        assert_eq!(colliding_keys(&record.pairs), vec![""]);

        let clean = encode(&mapping(json!({ "a": "1", "b": "2" }))).unwrap();
        assert!(colliding_keys(&clean.pairs).is_empty());
    }

    #[test]
    fn decode_keeps_base64_keys_verbatim() {
        let m = mapping(json!({ "name": "café" }));
        let decoded = decode(encode(&m).as_ref());
        assert!(decoded.contains_key("name_base64"));
        assert!(!decoded.contains_key("name"));
        assert_eq!(text_field(&decoded, "name").as_deref(), Some("café"));
    }

    #[test]
    fn decode_reply_requires_pairs() {
        assert_eq!(decode_reply(json!({ "faultstring": "boom" })), None);
        assert_eq!(decode_reply(json!("not a record")), None);

        let reply = decode_reply(json!({
            "pairs": [
                { "key": "result", "value": { "str": "success", "arr": null } },
                { "key": "resultData", "value": { "str": null, "arr": null } }
            ]
        }))
        .unwrap();
        assert_eq!(reply["result"], FieldValue::Text("success".into()));
        assert_eq!(reply["resultData"], FieldValue::Map(Mapping::new()));
    }

    #[test]
    fn text_field_prefers_plain_value() {
        let m = mapping(json!({ "listName": "plain", "listName_base64": "aWdub3JlZA==" }));
        assert_eq!(text_field(&m, "listName").as_deref(), Some("plain"));
        assert_eq!(text_field(&m, "missing"), None);
    }
}
