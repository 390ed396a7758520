//! Core types for decoded XPT data.
//!
//! This module provides the data structures produced by the decoder:
//! variables, cell values, missing-value codes and the decoded table.

mod missing;
mod table;
mod value;
mod variable;

pub use missing::MissingValue;
pub use table::XptTable;
pub use value::{NumericValue, Value};
pub use variable::{VarType, Variable};
