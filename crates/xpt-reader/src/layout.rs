//! Fixed-record layouts.
//!
//! A layout is an ordered list of typed fields with a byte order. Layouts are
//! built from `const` [`FieldSpec`] tables so the record width can be checked
//! at compile time with [`spec_size`]; the compact text form
//! (`>hhhh8s40s...`) is accepted by [`Layout::parse`] as well.
//!
//! # Grammar
//!
//! ```text
//! layout := [<>]? token*
//! token  := count? code
//! count  := [1-9][0-9]*
//! code   := x | c | ? | b | B | h | H | i | I | f | d | s
//! ```
//!
//! ASCII whitespace may separate tokens. For `x` (skip) and `s` (string) the
//! count is the byte width of a single field; every other code is repeated
//! `count` times.

use crate::error::{Result, XptError};

/// Byte order of multi-byte fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Most significant byte first (`>`, default).
    #[default]
    Big,
    /// Least significant byte first (`<`).
    Little,
}

/// Kind of a single record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCode {
    /// Padding, produces no value (`x`).
    Skip,
    /// One ASCII character (`c`).
    Char,
    /// Boolean byte (`?`).
    Bool,
    /// Signed byte (`b`).
    I8,
    /// Unsigned byte (`B`).
    U8,
    /// Signed 16-bit integer (`h`).
    I16,
    /// Unsigned 16-bit integer (`H`).
    U16,
    /// Signed 32-bit integer (`i`).
    I32,
    /// Unsigned 32-bit integer (`I`).
    U32,
    /// IEEE 32-bit float (`f`).
    F32,
    /// IEEE 64-bit float (`d`).
    F64,
    /// Fixed-length string (`s`).
    Str,
}

impl FieldCode {
    /// Map a grammar character to its field code.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'x' => Self::Skip,
            'c' => Self::Char,
            '?' => Self::Bool,
            'b' => Self::I8,
            'B' => Self::U8,
            'h' => Self::I16,
            'H' => Self::U16,
            'i' => Self::I32,
            'I' => Self::U32,
            'f' => Self::F32,
            'd' => Self::F64,
            's' => Self::Str,
            _ => return None,
        })
    }

    /// Grammar character for this code.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Skip => 'x',
            Self::Char => 'c',
            Self::Bool => '?',
            Self::I8 => 'b',
            Self::U8 => 'B',
            Self::I16 => 'h',
            Self::U16 => 'H',
            Self::I32 => 'i',
            Self::U32 => 'I',
            Self::F32 => 'f',
            Self::F64 => 'd',
            Self::Str => 's',
        }
    }

    /// Whether a count prefix sets the field width instead of repeating it.
    #[must_use]
    pub const fn count_is_width(self) -> bool {
        matches!(self, Self::Skip | Self::Str)
    }

    /// Width in bytes of one field of this kind (one byte per unit for
    /// width-counted codes).
    #[must_use]
    pub const fn unit_width(self) -> usize {
        match self {
            Self::Skip | Self::Char | Self::Bool | Self::I8 | Self::U8 | Self::Str => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

/// One `count code` token of a layout table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub count: usize,
    pub code: FieldCode,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(count: usize, code: FieldCode) -> Self {
        Self { count, code }
    }

    #[must_use]
    pub const fn one(code: FieldCode) -> Self {
        Self { count: 1, code }
    }

    /// Total bytes covered by this token.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.count * self.code.unit_width()
    }
}

/// Total record width of a layout table.
#[must_use]
pub const fn spec_size(specs: &[FieldSpec]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < specs.len() {
        total += specs[i].size();
        i += 1;
    }
    total
}

/// A compiled field: where it sits in the record and how to read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub offset: usize,
    pub width: usize,
    pub code: FieldCode,
}

/// Value extracted from one non-skip field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Char(char),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl FieldValue {
    /// Integer view of the value, if it is an integer field.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// String view of the value, if it is a string field.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Compiled record layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    order: ByteOrder,
    fields: Vec<FieldDescriptor>,
    size: usize,
}

impl Layout {
    /// Compile a layout table.
    #[must_use]
    pub fn compile(order: ByteOrder, specs: &[FieldSpec]) -> Self {
        let mut fields = Vec::new();
        let mut offset = 0usize;
        for spec in specs {
            if spec.code.count_is_width() {
                fields.push(FieldDescriptor {
                    offset,
                    width: spec.count,
                    code: spec.code,
                });
                offset += spec.count;
            } else {
                let width = spec.code.unit_width();
                for _ in 0..spec.count {
                    fields.push(FieldDescriptor {
                        offset,
                        width,
                        code: spec.code,
                    });
                    offset += width;
                }
            }
        }
        Self {
            order,
            fields,
            size: offset,
        }
    }

    /// Parse and compile a layout string.
    pub fn parse(spec: &str) -> Result<Self> {
        let (order, specs) = parse_specs(spec)?;
        Ok(Self::compile(order, &specs))
    }

    /// Byte order of multi-byte fields.
    #[must_use]
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Compiled fields in record order, padding included.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Record width in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Unpack one record into the values of its non-skip fields.
    pub fn unpack(&self, record: &[u8]) -> Result<Vec<FieldValue>> {
        if record.len() < self.size {
            return Err(XptError::RecordTooShort {
                expected: self.size,
                actual: record.len(),
            });
        }
        let values = self
            .fields
            .iter()
            .filter(|field| field.code != FieldCode::Skip)
            .map(|field| read_field(record, field, self.order))
            .collect();
        Ok(values)
    }
}

/// Largest record a layout string may describe.
pub const MAX_LAYOUT_SIZE: usize = 1 << 20;

fn parse_specs(spec: &str) -> Result<(ByteOrder, Vec<FieldSpec>)> {
    let mut chars = spec.chars().peekable();
    let order = match chars.peek() {
        Some('<') => {
            chars.next();
            ByteOrder::Little
        }
        Some('>') => {
            chars.next();
            ByteOrder::Big
        }
        _ => ByteOrder::Big,
    };

    let mut specs = Vec::new();
    let mut digits = String::new();
    let mut width = 0usize;
    for c in chars {
        if c.is_ascii_digit() {
            if digits.is_empty() && c == '0' {
                return Err(XptError::invalid_layout(spec, "count must not start with 0"));
            }
            digits.push(c);
            continue;
        }
        if c.is_ascii_whitespace() {
            if !digits.is_empty() {
                return Err(XptError::invalid_layout(
                    spec,
                    format!("count {digits} is not followed by a code"),
                ));
            }
            continue;
        }
        let code = FieldCode::from_char(c)
            .ok_or_else(|| XptError::invalid_layout(spec, format!("unknown code {c:?}")))?;
        let count = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<usize>()
                .map_err(|_| XptError::invalid_layout(spec, format!("count {digits} overflows")))?
        };
        digits.clear();
        let spec_width = count
            .checked_mul(code.unit_width())
            .and_then(|w| w.checked_add(width))
            .filter(|&w| w <= MAX_LAYOUT_SIZE);
        width = spec_width.ok_or_else(|| {
            XptError::invalid_layout(
                spec,
                format!("record width exceeds {MAX_LAYOUT_SIZE} bytes"),
            )
        })?;
        specs.push(FieldSpec::new(count, code));
    }

    if !digits.is_empty() {
        return Err(XptError::invalid_layout(
            spec,
            format!("trailing count {digits} without a code"),
        ));
    }
    Ok((order, specs))
}

fn read_field(record: &[u8], field: &FieldDescriptor, order: ByteOrder) -> FieldValue {
    let bytes = &record[field.offset..field.offset + field.width];
    match field.code {
        FieldCode::Char => FieldValue::Char(char::from(bytes[0])),
        FieldCode::Bool => FieldValue::Bool(bytes[0] != 0),
        FieldCode::I8 => FieldValue::Int(i64::from(bytes[0] as i8)),
        FieldCode::U8 => FieldValue::UInt(u64::from(bytes[0])),
        FieldCode::I16 => {
            let raw = fixed::<2>(bytes);
            FieldValue::Int(i64::from(match order {
                ByteOrder::Big => i16::from_be_bytes(raw),
                ByteOrder::Little => i16::from_le_bytes(raw),
            }))
        }
        FieldCode::U16 => {
            let raw = fixed::<2>(bytes);
            FieldValue::UInt(u64::from(match order {
                ByteOrder::Big => u16::from_be_bytes(raw),
                ByteOrder::Little => u16::from_le_bytes(raw),
            }))
        }
        FieldCode::I32 => {
            let raw = fixed::<4>(bytes);
            FieldValue::Int(i64::from(match order {
                ByteOrder::Big => i32::from_be_bytes(raw),
                ByteOrder::Little => i32::from_le_bytes(raw),
            }))
        }
        FieldCode::U32 => {
            let raw = fixed::<4>(bytes);
            FieldValue::UInt(u64::from(match order {
                ByteOrder::Big => u32::from_be_bytes(raw),
                ByteOrder::Little => u32::from_le_bytes(raw),
            }))
        }
        FieldCode::F32 => {
            let raw = fixed::<4>(bytes);
            FieldValue::Float(f64::from(match order {
                ByteOrder::Big => f32::from_be_bytes(raw),
                ByteOrder::Little => f32::from_le_bytes(raw),
            }))
        }
        FieldCode::F64 => {
            let raw = fixed::<8>(bytes);
            FieldValue::Float(match order {
                ByteOrder::Big => f64::from_be_bytes(raw),
                ByteOrder::Little => f64::from_le_bytes(raw),
            })
        }
        FieldCode::Str => FieldValue::Str(decode_text(bytes)),
        FieldCode::Skip => FieldValue::Str(String::new()),
    }
}

/// Decode stored text as windows-1252, the superset of Latin-1 SAS writes.
///
/// Every byte maps to a character, so nothing is replaced or dropped.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    encoding_rs::WINDOWS_1252
        .decode_without_bom_handling(bytes)
        .0
        .into_owned()
}

fn fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&bytes[..N]);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_namestr_layout() {
        let layout = Layout::parse(">hhhh8s40s8shhh2s8shhi52s").unwrap();
        assert_eq!(layout.size(), 140);
        assert_eq!(layout.order(), ByteOrder::Big);
        assert_eq!(layout.fields().len(), 16);
        assert_eq!(
            layout.fields()[4],
            FieldDescriptor {
                offset: 8,
                width: 8,
                code: FieldCode::Str
            }
        );
        assert_eq!(layout.fields()[14].offset, 84);
    }

    #[test]
    fn test_count_repeats_numeric_codes() {
        let layout = Layout::parse("8B").unwrap();
        assert_eq!(layout.fields().len(), 8);
        assert!(layout.fields().iter().all(|f| f.width == 1));
        assert_eq!(layout.fields()[7].offset, 7);
    }

    #[test]
    fn test_count_is_width_for_skip_and_string() {
        let layout = Layout::parse("3x5s").unwrap();
        assert_eq!(layout.fields().len(), 2);
        assert_eq!(layout.fields()[0].width, 3);
        assert_eq!(layout.fields()[1].offset, 3);
        assert_eq!(layout.fields()[1].width, 5);
        assert_eq!(layout.size(), 8);
    }

    #[test]
    fn test_char_count_repeats() {
        let layout = Layout::parse("3c").unwrap();
        let values = layout.unpack(b"ABC").unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Char('A'),
                FieldValue::Char('B'),
                FieldValue::Char('C')
            ]
        );
    }

    #[test]
    fn test_oversized_layouts_rejected() {
        for spec in ["18446744073709551615s1s", "999999999999h", "4611686018427387904d"] {
            let err = Layout::parse(spec).unwrap_err();
            assert!(
                matches!(err, XptError::InvalidLayoutSpec { .. }),
                "{spec} should be rejected"
            );
        }
        let at_limit = format!("{MAX_LAYOUT_SIZE}x");
        assert_eq!(Layout::parse(&at_limit).unwrap().size(), MAX_LAYOUT_SIZE);
        assert!(Layout::parse(&format!("{at_limit}c")).is_err());
    }

    #[test]
    fn test_invalid_specs() {
        for spec in ["hz", "0h", "3", ">>h", "h<", "2 h", "99999999999999999999999h"] {
            let err = Layout::parse(spec).unwrap_err();
            assert!(
                matches!(err, XptError::InvalidLayoutSpec { .. }),
                "{spec} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_spec_is_empty_layout() {
        let layout = Layout::parse("").unwrap();
        assert_eq!(layout.size(), 0);
        assert!(layout.unpack(b"").unwrap().is_empty());
        assert_eq!(Layout::parse(">").unwrap(), layout);
    }

    #[test]
    fn test_unpack_byte_orders() {
        let big = Layout::parse(">hHiI").unwrap();
        let data = [0xff, 0xfe, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0x80, 0x00, 0x00, 0x00];
        assert_eq!(
            big.unpack(&data).unwrap(),
            vec![
                FieldValue::Int(-2),
                FieldValue::UInt(2),
                FieldValue::Int(3),
                FieldValue::UInt(0x8000_0000)
            ]
        );

        let little = Layout::parse("<h").unwrap();
        assert_eq!(little.unpack(&[0x02, 0x00]).unwrap(), vec![FieldValue::Int(2)]);
    }

    #[test]
    fn test_unpack_floats_bools_and_skip() {
        let layout = Layout::parse(">?2xfd").unwrap();
        let mut data = vec![1u8, 0xaa, 0xbb];
        data.extend_from_slice(&1.5f32.to_be_bytes());
        data.extend_from_slice(&(-2.25f64).to_be_bytes());
        assert_eq!(
            layout.unpack(&data).unwrap(),
            vec![
                FieldValue::Bool(true),
                FieldValue::Float(1.5),
                FieldValue::Float(-2.25)
            ]
        );
    }

    #[test]
    fn test_unpack_short_record() {
        let layout = Layout::parse("4s").unwrap();
        let err = layout.unpack(b"abc").unwrap_err();
        assert!(matches!(
            err,
            XptError::RecordTooShort {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_const_table_matches_text() {
        const SPECS: &[FieldSpec] = &[
            FieldSpec::new(2, FieldCode::I16),
            FieldSpec::new(8, FieldCode::Str),
            FieldSpec::one(FieldCode::I32),
        ];
        const _: () = assert!(spec_size(SPECS) == 16);
        assert_eq!(
            Layout::compile(ByteOrder::Big, SPECS),
            Layout::parse(">2h8si").unwrap()
        );
    }

    fn any_field_code() -> impl Strategy<Value = FieldCode> {
        prop::sample::select(vec![
            FieldCode::Char,
            FieldCode::Bool,
            FieldCode::I8,
            FieldCode::U8,
            FieldCode::I16,
            FieldCode::U16,
            FieldCode::I32,
            FieldCode::U32,
            FieldCode::F32,
            FieldCode::F64,
            FieldCode::Skip,
            FieldCode::Str,
        ])
    }

    proptest! {
        #[test]
        fn prop_grouping_and_whitespace_do_not_change_layout(
            tokens in prop::collection::vec((1usize..6, any_field_code()), 0..12)
        ) {
            let mut grouped = String::from(">");
            let mut expanded = String::new();
            for (count, code) in &tokens {
                grouped.push_str(&format!("{count}{}", code.as_char()));
                if code.count_is_width() {
                    expanded.push_str(&format!(" {count}{} ", code.as_char()));
                } else {
                    for _ in 0..*count {
                        expanded.push(code.as_char());
                        expanded.push(' ');
                    }
                }
            }
            let a = Layout::parse(&grouped).unwrap();
            let b = Layout::parse(&expanded).unwrap();
            prop_assert_eq!(&a, &b);

            let widths: usize = a.fields().iter().map(|f| f.width).sum();
            prop_assert_eq!(widths, a.size());
            for pair in a.fields().windows(2) {
                prop_assert_eq!(pair[0].offset + pair[0].width, pair[1].offset);
            }
        }
    }
}
