//! SAS Transport (XPT) file decoder.
//!
//! This crate decodes SAS Transport V5 files held in memory into a table of
//! column names and typed rows.
//!
//! # Features
//!
//! - Section lookup by header marker, no assumptions on record positions
//! - 140-byte and 136-byte (VAX/VMS) NAMESTR records
//! - IBM mainframe floating-point conversion, including truncated numerics
//! - All 28 SAS missing value codes (`.`, `._`, `.A`-`.Z`)
//! - Optional `serde` serialization (with `serde` feature)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use xpt_reader::read_xpt;
//!
//! let table = read_xpt(Path::new("dm.xpt")).unwrap();
//! println!("{:?} ({} rows)", table.header(), table.num_rows());
//! ```
//!
//! Decoding a buffer directly:
//!
//! ```
//! use xpt_reader::{XptError, decode_xpt};
//!
//! let err = decode_xpt(b"not a transport file").unwrap_err();
//! assert!(matches!(err, XptError::MissingSection { .. }));
//! ```

mod error;
pub mod float;
pub mod layout;
pub mod locate;
pub mod namestr;
mod reader;
mod types;

// Re-export error types
pub use error::{Result, XptError};

// Re-export core types
pub use types::{MissingValue, NumericValue, Value, VarType, Variable, XptTable};

// Re-export reader functionality
pub use locate::Section;
pub use reader::{Dataset, XptReader, decode_xpt, read_xpt};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
