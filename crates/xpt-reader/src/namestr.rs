//! NAMESTR record decoding.
//!
//! The NAMESTR record describes a single variable in an XPT dataset.
//! Each NAMESTR is 140 bytes (or 136 bytes for VAX/VMS).
//!
//! # NAMESTR Structure (140 bytes)
//!
//! | Offset | Field   | Type     | Description                    |
//! |--------|---------|----------|--------------------------------|
//! | 0-1    | ntype   | short    | 1=NUMERIC, 2=CHAR              |
//! | 2-3    | nhfun   | short    | Hash (always 0)                |
//! | 4-5    | nlng    | short    | Variable length in observation |
//! | 6-7    | nvar0   | short    | Variable number                |
//! | 8-15   | nname   | char[8]  | Variable name                  |
//! | 16-55  | nlabel  | char[40] | Variable label                 |
//! | 56-63  | nform   | char[8]  | Format name                    |
//! | 64-65  | nfl     | short    | Format field length            |
//! | 66-67  | nfd     | short    | Format decimals                |
//! | 68-69  | nfj     | short    | Justification (0=left, 1=right)|
//! | 70-71  | nfill   | char[2]  | Padding                        |
//! | 72-79  | niform  | char[8]  | Informat name                  |
//! | 80-81  | nifl    | short    | Informat length                |
//! | 82-83  | nifd    | short    | Informat decimals              |
//! | 84-87  | npos    | long     | Position in observation        |
//! | 88-139 | rest    | char[52] | Reserved (48 bytes on VAX/VMS) |

use tracing::{trace, warn};

use crate::error::{Result, XptError};
use crate::layout::{ByteOrder, FieldCode, FieldSpec, FieldValue, Layout, spec_size};
use crate::locate::{RECORD_LEN, find};
use crate::types::{VarType, Variable};

/// Standard NAMESTR length.
pub const NAMESTR_LEN: usize = 140;

/// VAX/VMS NAMESTR length (shorter reserved section).
pub const NAMESTR_LEN_VAX: usize = 136;

/// Offset of the 4-digit variable count in the NAMESTR header record.
pub const VAR_COUNT_OFFSET: usize = 54;

/// Bytes of the member header region searched for the descriptor size.
pub const MEMBER_HEADER_WINDOW: usize = 2 * RECORD_LEN;

const NAMESTR_PREFIX: [FieldSpec; 9] = [
    FieldSpec::new(4, FieldCode::I16),
    FieldSpec::new(8, FieldCode::Str),
    FieldSpec::new(40, FieldCode::Str),
    FieldSpec::new(8, FieldCode::Str),
    FieldSpec::new(3, FieldCode::I16),
    FieldSpec::new(2, FieldCode::Str),
    FieldSpec::new(8, FieldCode::Str),
    FieldSpec::new(2, FieldCode::I16),
    FieldSpec::one(FieldCode::I32),
];

const NAMESTR_FIELDS: [FieldSpec; 10] = with_rest(52);
const NAMESTR_FIELDS_VAX: [FieldSpec; 10] = with_rest(48);

const _: () = assert!(spec_size(&NAMESTR_FIELDS) == NAMESTR_LEN);
const _: () = assert!(spec_size(&NAMESTR_FIELDS_VAX) == NAMESTR_LEN_VAX);

const fn with_rest(rest: usize) -> [FieldSpec; 10] {
    let mut out = [FieldSpec::one(FieldCode::Skip); 10];
    let mut i = 0;
    while i < NAMESTR_PREFIX.len() {
        out[i] = NAMESTR_PREFIX[i];
        i += 1;
    }
    out[9] = FieldSpec::new(rest, FieldCode::Skip);
    out
}

// Value positions produced by the NAMESTR layout.
const NTYPE: usize = 0;
const NLNG: usize = 2;
const NVAR0: usize = 3;
const NNAME: usize = 4;
const NLABEL: usize = 5;

/// Width of one NAMESTR record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptorSize {
    /// 140-byte records.
    #[default]
    Standard,
    /// 136-byte records written on VAX/VMS.
    Vax,
}

impl DescriptorSize {
    /// Map a declared record width.
    #[must_use]
    pub const fn from_len(len: usize) -> Option<Self> {
        match len {
            NAMESTR_LEN => Some(Self::Standard),
            NAMESTR_LEN_VAX => Some(Self::Vax),
            _ => None,
        }
    }

    /// Record width in bytes.
    #[must_use]
    pub const fn record_len(self) -> usize {
        match self {
            Self::Standard => NAMESTR_LEN,
            Self::Vax => NAMESTR_LEN_VAX,
        }
    }

    /// Compiled record layout.
    #[must_use]
    pub fn layout(self) -> Layout {
        match self {
            Self::Standard => Layout::compile(ByteOrder::Big, &NAMESTR_FIELDS),
            Self::Vax => Layout::compile(ByteOrder::Big, &NAMESTR_FIELDS_VAX),
        }
    }
}

/// Read the NAMESTR width declared in the member header.
///
/// The member header ends in `...0160 000000 0140  ` (observation header
/// size, then NAMESTR size). The size is the 3-digit token that follows
/// `16` and eight zeros and precedes two spaces.
pub fn parse_descriptor_size(member_header: &[u8]) -> Result<DescriptorSize> {
    let token =
        size_token(member_header).ok_or_else(|| XptError::unsupported_descriptor_size(None))?;
    let text = String::from_utf8_lossy(token);
    text.parse::<usize>()
        .ok()
        .and_then(DescriptorSize::from_len)
        .ok_or_else(|| XptError::unsupported_descriptor_size(Some(text.as_ref())))
}

/// Descriptor size with the fallback to standard records.
pub fn descriptor_size_or_default(member_header: &[u8]) -> DescriptorSize {
    parse_descriptor_size(member_header).unwrap_or_else(|err| {
        warn!(error = %err, "falling back to {NAMESTR_LEN}-byte NAMESTR records");
        DescriptorSize::Standard
    })
}

fn size_token(window: &[u8]) -> Option<&[u8]> {
    const PREFIX: &[u8] = b"1600000000";
    let mut start = 0;
    while let Some(pos) = find(window, PREFIX, start) {
        let token_start = pos + PREFIX.len();
        if let Some(candidate) = window.get(token_start..token_start + 5) {
            let (digits, tail) = candidate.split_at(3);
            if digits.iter().all(u8::is_ascii_digit) && tail == b"  " {
                return Some(digits);
            }
        }
        start = pos + 1;
    }
    None
}

/// Parse the variable count from the NAMESTR header record.
///
/// The count is four zero-padded ASCII digits at offset 54.
pub fn parse_variable_count(header: &[u8]) -> Result<usize> {
    let field = header
        .get(VAR_COUNT_OFFSET..VAR_COUNT_OFFSET + 4)
        .ok_or_else(|| {
            let rest = header.get(VAR_COUNT_OFFSET..).unwrap_or_default();
            XptError::malformed_count(String::from_utf8_lossy(rest))
        })?;
    let text = String::from_utf8_lossy(field);
    if !field.iter().all(u8::is_ascii_digit) {
        return Err(XptError::malformed_count(text));
    }
    text.parse::<usize>()
        .map_err(|_| XptError::malformed_count(text.as_ref()))
}

/// Decode a single NAMESTR record.
pub fn parse_namestr(record: &[u8], layout: &Layout) -> Result<Variable> {
    let values = layout.unpack(record)?;
    let int_at = |idx: usize| values.get(idx).and_then(FieldValue::as_i64).unwrap_or(0);
    let str_at = |idx: usize| {
        values
            .get(idx)
            .and_then(FieldValue::as_str)
            .map(|s| s.trim_end_matches(|c: char| c.is_whitespace() || c == '\0'))
            .unwrap_or_default()
            .to_string()
    };

    let nlng = int_at(NLNG);
    let length = usize::try_from(nlng).unwrap_or_else(|_| {
        warn!(nlng, "negative variable length, treating as zero");
        0
    });

    Ok(Variable {
        name: str_at(NNAME),
        label: str_at(NLABEL),
        var_type: VarType::from_ntype(int_at(NTYPE)),
        length,
        varnum: int_at(NVAR0),
    })
}

/// Decode `count` consecutive NAMESTR records starting at `offset` and
/// order them by `varnum`.
///
/// The sort is stable, so equal variable numbers keep file order.
pub fn parse_namestr_records(
    data: &[u8],
    offset: usize,
    count: usize,
    size: DescriptorSize,
) -> Result<Vec<Variable>> {
    let layout = size.layout();
    let mut variables = Vec::with_capacity(count);

    for idx in 0..count {
        let start = idx
            .checked_mul(layout.size())
            .and_then(|rel| rel.checked_add(offset))
            .ok_or(XptError::RecordOutOfBounds { offset })?;
        let record = data
            .get(start..start + layout.size())
            .ok_or(XptError::RecordOutOfBounds { offset: start })?;
        let variable = parse_namestr(record, &layout)?;
        trace!(
            index = idx,
            name = %variable.name,
            var_type = %variable.var_type,
            length = variable.length,
            varnum = variable.varnum,
            "decoded NAMESTR"
        );
        variables.push(variable);
    }

    variables.sort_by_key(|v| v.varnum);
    Ok(variables)
}
