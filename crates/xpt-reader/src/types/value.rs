//! Cell values.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

use super::MissingValue;

/// Decoded numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    /// A present value.
    Value(f64),
    /// A missing value with its code.
    Missing(MissingValue),
}

impl NumericValue {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// The value, or `None` when missing.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Missing(_) => None,
        }
    }

    /// The missing code, or `None` when present.
    #[must_use]
    pub fn missing_type(&self) -> Option<MissingValue> {
        match self {
            Self::Value(_) => None,
            Self::Missing(m) => Some(*m),
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Missing(m) => write!(f, "{m}"),
        }
    }
}

/// Missing numerics serialize as `null`.
#[cfg(feature = "serde")]
impl Serialize for NumericValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::Missing(_) => serializer.serialize_none(),
        }
    }
}

/// One cell of a decoded row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(untagged))]
pub enum Value {
    /// Numeric cell.
    Num(NumericValue),
    /// Character cell, surrounding whitespace trimmed.
    Char(String),
}

impl Value {
    /// True for a missing numeric cell.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Num(n) if n.is_missing())
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Num(n) => n.value(),
            Self::Char(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Char(s) => Some(s),
            Self::Num(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Num(NumericValue::Value(v))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Char(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Char(s) => write!(f, "{s}"),
        }
    }
}
