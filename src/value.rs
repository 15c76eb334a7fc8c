use crate::statics;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Represents a number that can preserve distinction between integers and F64 for round-tripping.
/// `.bim` files are sensitive to integer vs float formatting (`compatibilityLevel: 1500` must
/// never come back as `1500.0`). Integers outside the 64-bit range keep all their digits.
#[derive(Debug, Clone, PartialEq)]
pub enum BimNumber {
    I64(i64),
    U64(u64),
    I128(i128),
    U128(u128),
    F64(f64),
}

impl BimNumber {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            BimNumber::I64(v) => Some(*v),
            BimNumber::U64(v) => i64::try_from(*v).ok(),
            BimNumber::I128(v) => i64::try_from(*v).ok(),
            BimNumber::U128(v) => i64::try_from(*v).ok(),
            BimNumber::F64(_) => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, BimNumber::F64(_))
    }

    /// Narrowest integer variant holding `v`.
    fn from_i128(v: i128) -> BimNumber {
        match i64::try_from(v) {
            Ok(v) => BimNumber::I64(v),
            Err(_) => match u64::try_from(v) {
                Ok(v) => BimNumber::U64(v),
                Err(_) => BimNumber::I128(v),
            },
        }
    }

    fn from_u128(v: u128) -> BimNumber {
        match i128::try_from(v) {
            Ok(v) => BimNumber::from_i128(v),
            Err(_) => BimNumber::U128(v),
        }
    }

    /// Parse edit-form text into an integer, using the narrowest variant that holds it.
    pub fn parse_integer(text: &str) -> Option<BimNumber> {
        let text = text.trim();
        if let Ok(v) = text.parse::<i128>() {
            return Some(BimNumber::from_i128(v));
        }
        text.parse::<u128>().ok().map(BimNumber::from_u128)
    }

    fn write_text(&self, out: &mut String) {
        match self {
            BimNumber::I64(v) => out.push_str(&v.to_string()),
            BimNumber::U64(v) => out.push_str(&v.to_string()),
            BimNumber::I128(v) => out.push_str(&v.to_string()),
            BimNumber::U128(v) => out.push_str(&v.to_string()),
            BimNumber::F64(v) => {
                if v.is_nan() {
                    out.push_str("NaN");
                } else if v.is_infinite() {
                    if v.is_sign_negative() {
                        out.push_str("-Infinity");
                    } else {
                        out.push_str("Infinity");
                    }
                } else {
                    let mut buf = ryu::Buffer::new();
                    out.push_str(buf.format_finite(*v));
                }
            }
        }
    }
}

impl Serialize for BimNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BimNumber::I64(v) => serializer.serialize_i64(*v),
            BimNumber::U64(v) => serializer.serialize_u64(*v),
            BimNumber::I128(v) => serializer.serialize_i128(*v),
            BimNumber::U128(v) => serializer.serialize_u128(*v),
            BimNumber::F64(v) => serializer.serialize_f64(*v),
        }
    }
}

/// Coarse runtime type of a value, used to decide coercion when an edit is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => statics::EN_TYPE_NULL,
            ValueKind::Bool => statics::EN_TYPE_BOOL,
            ValueKind::Integer => statics::EN_TYPE_INTEGER,
            ValueKind::Float => statics::EN_TYPE_FLOAT,
            ValueKind::String => statics::EN_TYPE_STRING,
            ValueKind::Array => statics::EN_TYPE_ARRAY,
            ValueKind::Object => statics::EN_TYPE_OBJECT,
        }
    }

    pub fn is_scalar(self) -> bool {
        !matches!(self, ValueKind::Array | ValueKind::Object)
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A value in a tabular model definition.
/// Mappings keep their key order so a saved file lists fields the way it was loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum BimValue {
    Null,
    Bool(bool),
    Number(BimNumber),
    String(String),
    Array(Vec<BimValue>),
    Object(IndexMap<String, BimValue>),
}

impl BimValue {
    pub fn as_object(&self) -> Option<&IndexMap<String, BimValue>> {
        match self {
            BimValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, BimValue>> {
        match self {
            BimValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[BimValue]> {
        match self {
            BimValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            BimValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            BimValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&BimValue> {
        self.as_object().and_then(|m| m.get(key))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            BimValue::Null => ValueKind::Null,
            BimValue::Bool(_) => ValueKind::Bool,
            BimValue::Number(n) if n.is_integer() => ValueKind::Integer,
            BimValue::Number(_) => ValueKind::Float,
            BimValue::String(_) => ValueKind::String,
            BimValue::Array(_) => ValueKind::Array,
            BimValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.kind() == ValueKind::Integer
    }

    pub fn is_scalar(&self) -> bool {
        self.kind().is_scalar()
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn parse_json5(text: &str) -> Result<BimValue, json5::Error> {
        json5::from_str::<BimValue>(text)
    }

    /// Text shown after `"key: "` in a tree label and in the edit form.
    /// Strings are shown bare; containers fall back to compact one-line JSON.
    pub fn display_text(&self) -> String {
        match self {
            BimValue::String(s) => s.clone(),
            BimValue::Array(_) | BimValue::Object(_) => self.to_json_compact(),
            _ => {
                let mut out = String::new();
                self.write_compact(&mut out);
                out
            }
        }
    }

    /// One-line JSON with `", "` and `": "` separators.
    pub fn to_json_compact(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    /// Serialize in the canonical `.bim` style:
    /// - 4-space indentation
    /// - keys always quoted, key order preserved
    /// - non-ASCII escaped (ensure_ascii)
    /// - empty containers stay on one line
    pub fn to_bim_pretty(&self) -> String {
        self.to_bim_pretty_with_newline(statics::NL_LF)
    }

    pub fn to_bim_pretty_with_newline(&self, newline: &str) -> String {
        let mut out = String::new();
        self.write_bim(&mut out, 0, newline);
        out
    }

    fn write_compact(&self, out: &mut String) {
        match self {
            BimValue::Null => out.push_str(statics::EN_LITERAL_NULL),
            BimValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            BimValue::Number(n) => n.write_text(out),
            BimValue::String(s) => write_escaped_string(out, s),
            BimValue::Array(values) => {
                out.push('[');
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    v.write_compact(out);
                }
                out.push(']');
            }
            BimValue::Object(map) => {
                out.push('{');
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_escaped_string(out, k);
                    out.push_str(": ");
                    v.write_compact(out);
                }
                out.push('}');
            }
        }
    }

    fn write_bim(&self, out: &mut String, indent: usize, newline: &str) {
        let step = statics::INDENT_WIDTH;
        match self {
            BimValue::Null => out.push_str(statics::EN_LITERAL_NULL),
            BimValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            BimValue::Number(n) => n.write_text(out),
            BimValue::String(s) => write_escaped_string_ascii(out, s),
            BimValue::Array(values) => {
                out.push('[');
                if !values.is_empty() {
                    out.push_str(newline);
                    for (i, v) in values.iter().enumerate() {
                        out.push_str(&" ".repeat(indent + step));
                        v.write_bim(out, indent + step, newline);
                        if i + 1 != values.len() {
                            out.push(',');
                        }
                        out.push_str(newline);
                    }
                    out.push_str(&" ".repeat(indent));
                }
                out.push(']');
            }
            BimValue::Object(map) => {
                out.push('{');
                if !map.is_empty() {
                    out.push_str(newline);
                    for (i, (k, v)) in map.iter().enumerate() {
                        out.push_str(&" ".repeat(indent + step));
                        write_escaped_string_ascii(out, k);
                        out.push_str(": ");
                        v.write_bim(out, indent + step, newline);
                        if i + 1 != map.len() {
                            out.push(',');
                        }
                        out.push_str(newline);
                    }
                    out.push_str(&" ".repeat(indent));
                }
                out.push('}');
            }
        }
    }
}

fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_escaped_string_ascii(out: &mut String, s: &str) {
    use std::fmt::Write as _;

    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if c.is_control() => {
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c if (c as u32) > 0x7F => {
                // Encode as one UTF-16 unit, or a surrogate pair above the BMP.
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(out, "\\u{:04x}", unit).ok();
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl Serialize for BimValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BimValue::Null => serializer.serialize_unit(),
            BimValue::Bool(v) => serializer.serialize_bool(*v),
            BimValue::Number(n) => n.serialize(serializer),
            BimValue::String(s) => serializer.serialize_str(s),
            BimValue::Array(values) => values.serialize(serializer),
            BimValue::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for BimValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = BimValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(BimValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(BimValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(BimValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(BimValue::Number(BimNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                // Keep the common non-negative case in I64 so equality does not depend on sign.
                match i64::try_from(v) {
                    Ok(v) => Ok(BimValue::Number(BimNumber::I64(v))),
                    Err(_) => Ok(BimValue::Number(BimNumber::U64(v))),
                }
            }

            fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
                Ok(BimValue::Number(BimNumber::from_i128(v)))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
                Ok(BimValue::Number(BimNumber::from_u128(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(BimValue::Number(BimNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(BimValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(BimValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<BimValue>()? {
                    values.push(value);
                }
                Ok(BimValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, BimValue>()? {
                    values.insert(key, value);
                }
                Ok(BimValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
