//! Decoded table.

#[cfg(feature = "serde")]
use serde::Serialize;

use super::{Value, Variable};

/// Result of decoding one transport file.
///
/// Variables are in declared (`varnum`) order and every row holds one value
/// per variable.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct XptTable {
    /// Column metadata.
    pub variables: Vec<Variable>,
    /// Observation rows.
    pub rows: Vec<Vec<Value>>,
    /// Bytes after the last complete observation that were not decoded.
    pub trailing_bytes: usize,
}

impl XptTable {
    /// Column names in output order.
    #[must_use]
    pub fn header(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.variables.len()
    }

    /// Flatten into a header row of names followed by the data rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<Value>> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(
            self.variables
                .into_iter()
                .map(|v| Value::Char(v.name))
                .collect(),
        );
        out.extend(self.rows);
        out
    }
}
