//! SAS missing value codes.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Missing value code of a numeric cell.
///
/// SAS stores a missing numeric as one sentinel byte followed by zero
/// bytes: `.` for the standard missing value, `_` and `A`-`Z` for the
/// special ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum MissingValue {
    /// `.`
    #[default]
    Standard,
    /// `._`
    Underscore,
    /// `.A` through `.Z`
    Special(char),
}

impl MissingValue {
    /// Classify the leading byte of a numeric field.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'.' => Some(Self::Standard),
            b'_' => Some(Self::Underscore),
            b'A'..=b'Z' => Some(Self::Special(byte as char)),
            _ => None,
        }
    }
}

impl fmt::Display for MissingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "."),
            Self::Underscore => write!(f, "._"),
            Self::Special(c) => write!(f, ".{c}"),
        }
    }
}
