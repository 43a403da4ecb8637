//! Scalar filter values and the lexical integer check.
//!
//! Decoded query strings only ever carry text, so a [`Scalar`] read from a
//! URL is always [`Scalar::String`]; numeric-looking strings are stored
//! as-is. Caller-supplied defaults may also carry real numbers. Pagination
//! decides whether a string is an integer lexically with
//! [`is_integer_like`], never by round-tripping through a float.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid regex"));

/// Returns `true` if `s` is an optional sign followed by one or more digits.
///
/// No whitespace, fraction or exponent is allowed; the empty string is never
/// integer-like.
pub fn is_integer_like(s: &str) -> bool {
    INTEGER_RE.is_match(s)
}

/// A single filter value.
///
/// # Example
///
/// ```
/// use standout_query::{Number, Scalar};
///
/// let from_url = Scalar::from("42");
/// assert_eq!(from_url, Scalar::String("42".into()));
///
/// let from_defaults = Scalar::from(7i64);
/// assert_eq!(from_defaults, Scalar::Number(Number::I64(7)));
/// assert_eq!(from_defaults.to_string(), "7");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Text, possibly numeric-looking.
    String(String),
    /// A real number, only ever supplied by caller defaults.
    Number(Number),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Number(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n.into())
    }
}

/// Numeric value.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers above `i64::MAX`
/// - `F64` for floating point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

// Conversions from primitive types
impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Number::U64(n), Number::I64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}
