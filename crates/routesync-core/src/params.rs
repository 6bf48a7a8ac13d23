//! Ordered parameter maps and the query/fragment codec.

use std::borrow::Cow;
use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::ParamOptions;
use crate::scalar::Value;

/// Characters `encodeURIComponent` leaves alone: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single key or value.
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

/// Percent-decode text; malformed sequences leave the input unchanged.
pub fn decode_component(text: &str) -> String {
    match percent_decode_str(text).decode_utf8() {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => text.to_string(),
    }
}

/// Ordered mapping from parameter name to value.
///
/// Keeps insertion order; inserting an existing key replaces its value in
/// place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert a value, returning the previous one for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Keep only entries for which `f` returns true.
    pub fn retain(&mut self, mut f: impl FnMut(&str, &Value) -> bool) {
        self.entries.retain(|(k, v)| f(k, v));
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Apply [`Value::coerced`] to every value.
    pub fn coerced(self) -> Self {
        self.into_iter().map(|(k, v)| (k, v.coerced())).collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct ParamsVisitor;

impl<'de> Visitor<'de> for ParamsVisitor {
    type Value = Params;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of parameters")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Params, A::Error> {
        let mut params = Params::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            params.insert(key, value);
        }
        Ok(params)
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ParamsVisitor)
    }
}

/// Decode a query or fragment string into raw string parameters.
///
/// A single leading `?` or `#` is ignored. Segments split on the first `=`;
/// a key with no `=` maps to `true`.
pub fn decode(text: &str) -> Params {
    let text = text
        .strip_prefix('?')
        .or_else(|| text.strip_prefix('#'))
        .unwrap_or(text);

    let mut params = Params::new();
    for segment in text.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = match segment.split_once('=') {
            Some((key, value)) => (key, Value::String(decode_component(value))),
            None => (segment, Value::Bool(true)),
        };
        params.insert(decode_component(key), value);
    }
    params
}

/// Decode with the per-axis options applied.
///
/// With `typed`, values are coerced and entries that become `null` or
/// `undefined` are dropped. A disabled axis decodes to an empty map.
pub fn decode_with(text: &str, options: &ParamOptions) -> Params {
    if !options.parse {
        return Params::new();
    }

    let params = decode(text);
    if !options.typed {
        return params;
    }

    let mut params = params.coerced();
    params.retain(|_, v| !v.is_nil());
    params
}

/// Encode parameters as `k=v&k=v`.
///
/// `clean` drops `null`, `undefined` and empty strings. `short_boolean`
/// drops `false` and writes `true` as the bare key. An empty map encodes to
/// the empty string.
pub fn encode(params: &Params, clean: bool, short_boolean: bool) -> String {
    let mut pairs = Vec::with_capacity(params.len());

    for (key, value) in params.iter() {
        if clean && (value.is_nil() || value.is_empty_string()) {
            continue;
        }
        if short_boolean {
            match value {
                Value::Bool(false) => continue,
                Value::Bool(true) => {
                    pairs.push(encode_component(key));
                    continue;
                }
                _ => {}
            }
        }
        pairs.push(format!(
            "{}={}",
            encode_component(key),
            encode_component(&value.to_string())
        ));
    }

    pairs.join("&")
}

/// Encode with the per-axis options applied.
pub fn encode_with(params: &Params, options: &ParamOptions) -> String {
    encode(params, options.clean, options.short_boolean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::scalar::coerce;

    #[test]
    fn test_decode_basic() {
        let params = decode("?a=1&b=hello&flag");
        assert_eq!(params.get("a"), Some(&Value::from("1")));
        assert_eq!(params.get("b"), Some(&Value::from("hello")));
        assert_eq!(params.get("flag"), Some(&Value::Bool(true)));
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a", "b", "flag"]);
    }

    #[test]
    fn test_decode_strips_fragment_marker() {
        let params = decode("#tab=info");
        assert_eq!(params.get("tab"), Some(&Value::from("info")));
    }

    #[test]
    fn test_decode_splits_on_first_equals() {
        let params = decode("expr=a=b");
        assert_eq!(params.get("expr"), Some(&Value::from("a=b")));
    }

    #[test]
    fn test_decode_discards_empty_segments() {
        let params = decode("&&a=1&&");
        assert_eq!(params.len(), 1);
        assert!(decode("").is_empty());
        assert!(decode("?").is_empty());
    }

    #[test]
    fn test_decode_percent_escapes() {
        let params = decode("na%20me=caf%C3%A9&bad=100%");
        assert_eq!(params.get("na me"), Some(&Value::from("café")));
        assert_eq!(params.get("bad"), Some(&Value::from("100%")));
    }

    #[test]
    fn test_decode_duplicate_keys_keep_last() {
        let params = decode("a=1&b=2&a=3");
        assert_eq!(params.get("a"), Some(&Value::from("3")));
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_decode_with_typed_drops_nil() {
        let options = ParamOptions::default();
        let params = decode_with("a=42&b=true&c=null&d=undefined&e=x", &options);
        assert_eq!(params.get("a"), Some(&Value::Number(42.0)));
        assert_eq!(params.get("b"), Some(&Value::Bool(true)));
        assert!(!params.contains_key("c"));
        assert!(!params.contains_key("d"));
        assert_eq!(params.get("e"), Some(&Value::from("x")));
    }

    #[test]
    fn test_decode_with_untyped_and_disabled() {
        let untyped = ParamOptions {
            typed: false,
            ..ParamOptions::default()
        };
        let params = decode_with("a=42&c=null", &untyped);
        assert_eq!(params.get("a"), Some(&Value::from("42")));
        assert_eq!(params.get("c"), Some(&Value::from("null")));

        let disabled = ParamOptions {
            parse: false,
            ..ParamOptions::default()
        };
        assert!(decode_with("a=42", &disabled).is_empty());
    }

    #[test]
    fn test_encode_plain() {
        let params = Params::new()
            .with("q", "rust lang")
            .with("page", 2)
            .with("exact", true);
        assert_eq!(encode(&params, false, false), "q=rust%20lang&page=2&exact=true");
        assert_eq!(encode(&Params::new(), false, false), "");
    }

    #[test]
    fn test_encode_clean() {
        let params = Params::new()
            .with("a", Value::Null)
            .with("b", "")
            .with("c", Value::Undefined)
            .with("d", "x");
        assert_eq!(encode(&params, true, false), "d=x");
        assert_eq!(encode(&params, false, false), "a=null&b=&c=undefined&d=x");
    }

    #[test]
    fn test_encode_short_boolean() {
        let params = Params::new()
            .with("open", true)
            .with("closed", false)
            .with("n", 1);
        assert_eq!(encode(&params, false, true), "open&n=1");
        assert_eq!(encode(&params, false, false), "open=true&closed=false&n=1");
    }

    #[test]
    fn test_encode_reserved_characters() {
        let params = Params::new().with("a&b", "c=d/e?f");
        assert_eq!(encode(&params, false, false), "a%26b=c%3Dd%2Fe%3Ff");
    }

    #[test]
    fn test_typed_round_trip() {
        let params = Params::new()
            .with("name", "ada lovelace")
            .with("age", 36)
            .with("ratio", 0.5)
            .with("active", true)
            .with("admin", false)
            .with("code", "007");
        let encoded = encode(&params, false, false);
        let decoded = decode_with(&encoded, &ParamOptions::default());
        assert_eq!(decoded, params.coerced());
    }

    #[test]
    fn test_params_insert_replaces_in_place() {
        let mut params = Params::new().with("a", 1).with("b", 2);
        assert_eq!(params.insert("a", 3), Some(Value::Number(1.0)));
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(params.remove("a"), Some(Value::Number(3.0)));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_params_serde_keeps_order() {
        let params = Params::new().with("z", 1).with("a", "x");
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"z":1,"a":"x"}"#);
    }

    fn value_strategy() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<f64>()
                .prop_filter("NaN never compares equal", |n| !n.is_nan())
                .prop_map(Value::Number),
            (-1_000_000i64..1_000_000).prop_map(Value::from),
            "\\PC{0,8}"
                .prop_filter("nil literals are dropped on decode", |s| !coerce(s).is_nil())
                .prop_map(Value::String),
        ]
    }

    fn params_strategy() -> impl Strategy<Value = Params> {
        prop::collection::vec(("\\PC{1,8}", value_strategy()), 0..6)
            .prop_map(|pairs| pairs.into_iter().collect::<Params>())
    }

    proptest! {
        #[test]
        fn test_typed_round_trip_for_any_params(params in params_strategy()) {
            let encoded = encode(&params, false, false);
            let decoded = decode_with(&encoded, &ParamOptions::default());
            prop_assert_eq!(decoded, params.coerced());
        }

        #[test]
        fn test_untyped_round_trip_keeps_text(
            pairs in prop::collection::vec(("\\PC{1,8}", "\\PC{0,8}"), 0..6),
        ) {
            let params: Params = pairs.into_iter().collect();
            let encoded = encode(&params, false, false);
            let untyped = ParamOptions::default().with_typed(false);
            prop_assert_eq!(decode_with(&encoded, &untyped), params);
        }
    }
}
