//! Typed scalar values and string coercion.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};

/// Largest integer a double represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A parameter value, either raw text or the result of coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `true` / `false`.
    Bool(bool),
    /// Any numeric literal.
    Number(f64),
    /// The literal `null`.
    Null,
    /// The literal `undefined`.
    Undefined,
    /// Anything else.
    String(String),
}

impl Value {
    /// Run string values through [`coerce`]; other values pass through.
    pub fn coerced(self) -> Value {
        match self {
            Value::String(s) => coerce(&s),
            other => other,
        }
    }

    /// True for `Null` and `Undefined`.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// True for the empty string.
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Value::String(s) if s.is_empty())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Null => f.write_str("null"),
            Value::Undefined => f.write_str("undefined"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Convert a string token into a typed value.
///
/// `true`/`false`/`null`/`undefined` are matched case-insensitively, numeric
/// text (after trimming) becomes a number, anything else stays a string.
pub fn coerce(token: &str) -> Value {
    match token.to_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "undefined" => return Value::Undefined,
        "null" => return Value::Null,
        _ => {}
    }

    match parse_number(token) {
        Some(n) => Value::Number(n),
        None => Value::String(token.to_string()),
    }
}

/// Parse numeric text the way a browser's `Number()` does.
///
/// Accepts decimal literals with optional sign, fraction and exponent,
/// `Infinity`, and unsigned `0x`/`0o`/`0b` integers. Blank input is not a
/// number.
pub fn parse_number(text: &str) -> Option<f64> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() {
            return None;
        }
        return digits.chars().try_fold(0f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
        });
    }

    // f64::from_str also takes "inf"/"nan", which are not numbers here
    let decimal_only = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !decimal_only || !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    s.parse::<f64>().ok()
}

/// Render a number the way it reads in a URL.
///
/// Magnitudes of `1e21` and up, or below `1e-6`, use exponent notation
/// with an explicit sign (`1e+21`, `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    } else {
        format!("{}", n)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Null | Value::Undefined => serializer.serialize_unit(),
            Value::String(s) => serializer.serialize_str(s),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, number, string or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_booleans() {
        assert_eq!(coerce("true"), Value::Bool(true));
        assert_eq!(coerce("FALSE"), Value::Bool(false));
        assert_eq!(coerce("True"), Value::Bool(true));
        // not trimmed before the keyword test
        assert_eq!(coerce(" true"), Value::String(" true".to_string()));
    }

    #[test]
    fn test_coerce_nil_literals() {
        assert_eq!(coerce("null"), Value::Null);
        assert_eq!(coerce("NULL"), Value::Null);
        assert_eq!(coerce("undefined"), Value::Undefined);
    }

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(coerce("42"), Value::Number(42.0));
        assert_eq!(coerce(" -1.5 "), Value::Number(-1.5));
        assert_eq!(coerce("1e3"), Value::Number(1000.0));
        assert_eq!(coerce(".5"), Value::Number(0.5));
        assert_eq!(coerce("0x1A"), Value::Number(26.0));
        assert_eq!(coerce("0b101"), Value::Number(5.0));
        assert_eq!(coerce("Infinity"), Value::Number(f64::INFINITY));
    }

    #[test]
    fn test_coerce_leaves_strings() {
        assert_eq!(coerce("hello"), Value::String("hello".to_string()));
        assert_eq!(coerce(""), Value::String(String::new()));
        assert_eq!(coerce("   "), Value::String("   ".to_string()));
        assert_eq!(coerce("inf"), Value::String("inf".to_string()));
        assert_eq!(coerce("nan"), Value::String("nan".to_string()));
        assert_eq!(coerce("12abc"), Value::String("12abc".to_string()));
        assert_eq!(coerce("1_000"), Value::String("1_000".to_string()));
        assert_eq!(coerce("0x"), Value::String("0x".to_string()));
    }

    #[test]
    fn test_coerced_passes_non_strings_through() {
        assert_eq!(Value::Bool(false).coerced(), Value::Bool(false));
        assert_eq!(Value::Number(3.0).coerced(), Value::Number(3.0));
        assert_eq!(Value::from("7").coerced(), Value::Number(7.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Undefined.to_string(), "undefined");
    }

    #[test]
    fn test_format_number_exponent_range() {
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(coerce(&format_number(1e21)), Value::Number(1e21));
    }

    #[test]
    fn test_serde_json() {
        let json = serde_json::to_string(&vec![
            Value::Bool(true),
            Value::Number(42.0),
            Value::Number(0.25),
            Value::Null,
            Value::from("x"),
        ])
        .unwrap();
        assert_eq!(json, r#"[true,42,0.25,null,"x"]"#);

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[1], Value::Number(42.0));
        assert_eq!(back[3], Value::Null);
    }
}
