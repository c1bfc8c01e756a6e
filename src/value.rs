//! Field values.
//!
//! [`Value`] is what callers hand in for each fully-qualified field name, and what the
//! inherited environment carries down the field tree. Every conversion is total: a value of
//! the "wrong" kind converts to a defined fallback instead of failing.

use crate::object::Object;
use crate::text_string::decode_text_string;
use serde::Deserialize;
use std::collections::HashMap;

/// Caller-supplied values keyed by fully-qualified field name (`"Address.Line1"`).
pub type FieldValues = HashMap<String, Value>;

/// A field value.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "RawValue")]
pub enum Value {
    /// No value
    #[default]
    None,
    /// Explicitly switched off (buttons write their `/Off` state)
    Off,
    /// Integer value
    Integer(i64),
    /// Real value
    Real(f64),
    /// Boolean value
    Boolean(bool),
    /// Text value
    String(String),
    /// Ordered selection of strings (multi-select choice fields)
    List(Vec<String>),
    /// Existing array contents taken from the document (e.g. an inherited `/Opt`)
    Array(Vec<Object>),
}

impl Value {
    /// Short type tag, used in trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Off => "off",
            Value::Integer(_) => "int",
            Value::Real(_) => "real",
            Value::Boolean(_) => "bool",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Array(_) => "array",
        }
    }

    /// Whether this is `None` or `Off`.
    pub fn is_off(&self) -> bool {
        matches!(self, Value::None | Value::Off)
    }

    /// Convert to an integer. Strings parse like C `strtoll` with base 0.
    pub fn to_integer(&self) -> i64 {
        match self {
            Value::None | Value::Off | Value::List(_) | Value::Array(_) => 0,
            Value::Integer(i) => *i,
            Value::Real(r) => *r as i64,
            Value::Boolean(b) => i64::from(*b),
            Value::String(s) => parse_integer_prefix(s),
        }
    }

    /// Convert to a real number. Strings parse their longest numeric prefix.
    pub fn to_real(&self) -> f64 {
        match self {
            Value::None | Value::Off | Value::List(_) | Value::Array(_) => 0.0,
            Value::Integer(i) => *i as f64,
            Value::Real(r) => *r,
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::String(s) => parse_real_prefix(s),
        }
    }

    /// Convert to a boolean.
    pub fn to_bool(&self) -> bool {
        match self {
            Value::None | Value::Off => false,
            Value::Integer(i) => *i != 0,
            Value::Real(r) => *r != 0.0,
            Value::Boolean(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Array(_) => true,
        }
    }

    /// Convert to text. Lists and arrays have no single text form and yield `""`.
    pub fn to_text(&self) -> String {
        match self {
            Value::None | Value::Off | Value::List(_) | Value::Array(_) => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) => r.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => s.clone(),
        }
    }

    /// Read an inheritable attribute off a field dictionary.
    ///
    /// Names and strings become `String`, numbers and booleans keep their kind, arrays are
    /// carried as the original objects. Anything else has no value.
    pub fn from_object(obj: &Object) -> Value {
        match obj {
            Object::Name(n) => Value::String(n.clone()),
            Object::String(bytes) => Value::String(decode_text_string(bytes)),
            Object::Integer(i) => Value::Integer(*i),
            Object::Real(r) => Value::Real(*r),
            Object::Boolean(b) => Value::Boolean(*b),
            Object::Array(items) => Value::Array(items.clone()),
            _ => Value::None,
        }
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

/// JSON shape accepted for a value: null, bool, number, string or array of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
    List(Vec<String>),
    Null(()),
}

impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Boolean(b) => Value::Boolean(b),
            RawValue::Integer(i) => Value::Integer(i),
            RawValue::Real(r) => Value::Real(r),
            RawValue::String(s) => Value::String(s),
            RawValue::List(items) => Value::List(items),
            RawValue::Null(()) => Value::None,
        }
    }
}

fn parse_integer_prefix(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if rest.starts_with("0x") || rest.starts_with("0X") {
        (16, &rest[2..])
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map(|(i, _)| i)
        .unwrap_or(digits.len());

    if end == 0 {
        return 0;
    }
    // Out-of-range input saturates.
    let magnitude = i128::from_str_radix(&digits[..end], radix).unwrap_or(i128::MAX);
    let signed = if negative { -magnitude } else { magnitude };
    signed.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

fn parse_real_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let candidate_len = s
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    (1..=candidate_len)
        .rev()
        .find_map(|len| s[..len].parse::<f64>().ok())
        .unwrap_or(0.0)
}
