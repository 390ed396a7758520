//! Variable (column) metadata.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Storage class of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum VarType {
    /// IBM floating point, `ntype == 1`.
    Numeric,
    /// Fixed-width text, any other `ntype`.
    Character,
}

impl VarType {
    /// Map the NAMESTR `ntype` field.
    #[must_use]
    pub const fn from_ntype(ntype: i64) -> Self {
        if ntype == 1 {
            Self::Numeric
        } else {
            Self::Character
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "Num"),
            Self::Character => write!(f, "Char"),
        }
    }
}

/// One decoded NAMESTR record.
///
/// Names are not required to be unique; duplicates are passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Variable {
    /// Variable name, trailing whitespace trimmed.
    pub name: String,
    /// Variable label, trailing whitespace trimmed (may be empty).
    pub label: String,
    /// Storage class.
    pub var_type: VarType,
    /// Width of the variable in each observation.
    pub length: usize,
    /// Declared position (`nvar0`), determines column order.
    pub varnum: i64,
}

impl Variable {
    /// Create a numeric variable of the given width.
    #[must_use]
    pub fn numeric(name: impl Into<String>, length: usize, varnum: i64) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            var_type: VarType::Numeric,
            length,
            varnum,
        }
    }

    /// Create a character variable of the given width.
    #[must_use]
    pub fn character(name: impl Into<String>, length: usize, varnum: i64) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            var_type: VarType::Character,
            length,
            varnum,
        }
    }
}
