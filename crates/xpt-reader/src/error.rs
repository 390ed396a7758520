//! Error types for XPT decoding.

use std::path::PathBuf;
use thiserror::Error;

use crate::locate::Section;

/// Errors that can occur while decoding an XPT buffer.
#[derive(Debug, Error)]
pub enum XptError {
    /// A required section marker is absent from the buffer.
    #[error("invalid XPT file: {section} header not found")]
    MissingSection { section: Section },

    /// A record layout string does not match the layout grammar.
    #[error("invalid layout spec {spec:?}: {message}")]
    InvalidLayoutSpec { spec: String, message: String },

    /// The variable count in the NAMESTR header is not four ASCII digits.
    #[error("malformed variable count: {text:?}")]
    MalformedCount { text: String },

    /// The member header carries no recognised descriptor size.
    #[error("unsupported NAMESTR descriptor size: {token:?}")]
    UnsupportedDescriptorSize { token: Option<String> },

    /// A record is shorter than the layout used to unpack it.
    #[error("record too short: expected {expected} bytes, got {actual}")]
    RecordTooShort { expected: usize, actual: usize },

    /// A record extends past the end of the buffer.
    #[error("record out of bounds at offset {offset}")]
    RecordOutOfBounds { offset: usize },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for XPT operations.
pub type Result<T> = std::result::Result<T, XptError>;

impl XptError {
    /// Create a MissingSection error.
    pub fn missing_section(section: Section) -> Self {
        Self::MissingSection { section }
    }

    /// Create an InvalidLayoutSpec error.
    pub fn invalid_layout(spec: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidLayoutSpec {
            spec: spec.into(),
            message: message.into(),
        }
    }

    /// Create a MalformedCount error.
    pub fn malformed_count(text: impl Into<String>) -> Self {
        Self::MalformedCount { text: text.into() }
    }

    /// Create an UnsupportedDescriptorSize error.
    pub fn unsupported_descriptor_size(token: Option<&str>) -> Self {
        Self::UnsupportedDescriptorSize {
            token: token.map(str::to_string),
        }
    }
}
