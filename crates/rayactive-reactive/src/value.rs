#![forbid(unsafe_code)]

//! Plain data values held by observable objects.
//!
//! [`Value`] is the JSON-like payload a view-model supplies. [`Field`] is what
//! a read through an [`Observable`] hands back: either a scalar or the proxy
//! that now owns a nested object.
//!
//! String coercion and truthiness follow the rules of template interpolation,
//! so `18` renders as `18` (not `18.0`) and a missing key renders as
//! `undefined`.

use std::collections::BTreeMap;
use std::fmt;

use crate::observable::Observable;

/// Property map of a plain object.
pub type Map = BTreeMap<String, Value>;

/// A plain, unobserved data value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent property.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Nested object; wrapped into an [`Observable`] on first read.
    Object(Map),
}

impl Value {
    /// Whether this value would be wrapped into a nested proxy when read.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Interpolation truthiness.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Object(_) => true,
        }
    }

    /// Strict equality for scalars. `NaN` is never equal to itself.
    ///
    /// Two plain objects are never strictly equal: identity only exists once
    /// they are wrapped, see [`Field::strict_eq`].
    #[must_use]
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }

    /// Convert into a `serde_json::Value`. `undefined` becomes `null` and
    /// non-finite numbers become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n.abs() >= 1e21 || (n != 0.0 && n.abs() < 1e-6) {
        write_exponent(f, n)
    } else if n.fract() == 0.0 {
        // -0 prints as 0.
        write!(f, "{}", n as i128)
    } else {
        write!(f, "{n}")
    }
}

/// `1e+21`, `1.5e-7`: shortest mantissa, explicit exponent sign.
fn write_exponent(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
        _ => f.write_str(&formatted),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write_number(f, *n),
            Self::String(s) => f.write_str(s),
            Self::Object(_) => f.write_str("[object Object]"),
        }
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64, usize);

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Object(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            // Arrays carry no special reactivity; expose their indices as keys.
            serde_json::Value::Array(items) => Self::Object(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), Self::from(v)))
                    .collect(),
            ),
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Result of reading a property through an [`Observable`].
///
/// `Field::Value` never holds [`Value::Object`]: object-valued properties are
/// always handed out as their wrapping proxy.
#[derive(Debug, Clone)]
pub enum Field {
    Value(Value),
    Object(Observable),
}

impl Field {
    /// The undefined field returned for missing keys.
    #[must_use]
    pub fn undefined() -> Self {
        Self::Value(Value::Undefined)
    }

    /// Scalar payload, if this is not a nested object.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Object(_) => None,
        }
    }

    /// Nested proxy, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&Observable> {
        match self {
            Self::Value(_) => None,
            Self::Object(o) => Some(o),
        }
    }

    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Value(v) => v.is_truthy(),
            Self::Object(_) => true,
        }
    }

    /// Strict (identity) equality: scalars by value, objects by proxy.
    #[must_use]
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a.strict_eq(b),
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => v.fmt(f),
            Self::Object(_) => f.write_str("[object Object]"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
