//! Section marker lookup.
//!
//! An XPT file is a sequence of 80-byte records. The structural regions
//! are introduced by fixed ASCII header records:
//!
//! 1. Member header: `HEADER RECORD*******MEMBER  HEADER RECORD!!!!!!!...`
//! 2. NAMESTR header: `HEADER RECORD*******NAMESTR HEADER RECORD!!!!!!!...`
//! 3. OBS header: `HEADER RECORD*******OBS     HEADER RECORD!!!!!!!...`
//!
//! Headers are found by plain substring search; only metadata sits in front
//! of the observations so a linear scan is cheap.

use std::fmt;

use crate::error::{Result, XptError};

/// Record length in bytes.
pub const RECORD_LEN: usize = 80;

/// Structural section of a transport file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Member header, carries the NAMESTR descriptor size.
    Member,
    /// NAMESTR header, carries the variable count.
    Namestr,
    /// OBS header, observation data starts one record after it.
    Obs,
}

impl Section {
    /// Marker text that opens the section's header record.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Member => "HEADER RECORD*******MEMBER",
            Self::Namestr => "HEADER RECORD*******NAMESTR",
            Self::Obs => "HEADER RECORD*******OBS",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "MEMBER"),
            Self::Namestr => write!(f, "NAMESTR"),
            Self::Obs => write!(f, "OBS"),
        }
    }
}

/// Find the first exact occurrence of `needle` in `haystack` at or after `start`.
#[must_use]
pub fn find(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if needle.is_empty() {
        return (start <= haystack.len()).then_some(start);
    }
    let tail = haystack.get(start..)?;
    tail.windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| start + pos)
}

/// Offset of a section header record, or `MissingSection`.
pub fn require(data: &[u8], section: Section) -> Result<usize> {
    find(data, section.marker().as_bytes(), 0).ok_or_else(|| XptError::missing_section(section))
}
