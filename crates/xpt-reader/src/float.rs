//! IBM hexadecimal floating point.
//!
//! XPT numerics are stored in the System/360 format, big-endian:
//!
//! | Bits  | Field    | Description                           |
//! |-------|----------|---------------------------------------|
//! | 0     | sign     | 1 = negative                          |
//! | 1-7   | exponent | power of 16, biased by 64             |
//! | 8-63  | fraction | binary fraction in `[0, 1)`           |
//!
//! value = (-1)^sign × 16^(exponent - 64) × fraction
//!
//! Fields may be stored truncated to fewer than 8 bytes; the fraction then
//! simply has fewer bits. A field whose first byte is `.`, `_` or `A`-`Z`
//! and whose remaining bytes are all zero is a missing value.

use crate::types::{MissingValue, NumericValue};

/// Exponent bias of the IBM format.
pub const EXPONENT_BIAS: i32 = 64;

/// Classify a numeric field as a missing value.
#[must_use]
pub fn missing_kind(bytes: &[u8]) -> Option<MissingValue> {
    let (&first, rest) = bytes.split_first()?;
    let kind = MissingValue::from_byte(first)?;
    rest.iter().all(|&b| b == 0).then_some(kind)
}

/// Split the leading byte into the sign flag and the unbiased exponent.
#[must_use]
pub const fn split_sign_exponent(byte: u8) -> (bool, i32) {
    let negative = byte & 0x80 != 0;
    let exponent = (byte & 0x7f) as i32 - EXPONENT_BIAS;
    (negative, exponent)
}

/// Binary fraction held by the bytes after the leading one.
///
/// Bits are read most significant first, the first with weight 2⁻¹.
#[must_use]
pub fn fraction(bytes: &[u8]) -> f64 {
    let mut total = 0.0f64;
    let mut weight = 1.0f64;
    for &byte in bytes.iter().skip(1) {
        for shift in (0..8).rev() {
            weight /= 2.0;
            if (byte >> shift) & 1 == 1 {
                total += weight;
            }
        }
    }
    total
}

/// Decode one numeric field.
#[must_use]
pub fn ibm_to_f64(bytes: &[u8]) -> NumericValue {
    if let Some(missing) = missing_kind(bytes) {
        return NumericValue::Missing(missing);
    }
    let Some(&first) = bytes.first() else {
        return NumericValue::Value(0.0);
    };
    let (negative, exponent) = split_sign_exponent(first);
    let magnitude = 16f64.powi(exponent) * fraction(bytes);
    NumericValue::Value(if negative { -magnitude } else { magnitude })
}
