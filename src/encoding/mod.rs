//! Base-62 rendering of hex identifiers
//!
//! Identifiers are embedded in device names and plugin fields, where every
//! character counts. A 12-digit VPC identifier shrinks to at most 9 base-62
//! digits and a 4-digit attachment identifier to at most 3.

use tracing::error;

use crate::error::{Error, Result};

const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Render `value` in base 62 without padding
pub fn encode_u64(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(11);
    while value > 0 {
        digits.push(ALPHABET[(value % 62) as usize]);
        value /= 62;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

/// Parse a base-62 numeral produced by [`encode_u64`]
pub fn decode_u64(numeral: &str) -> Result<u64> {
    if numeral.is_empty() {
        return Err(Error::encoding("empty base62 numeral"));
    }
    numeral.bytes().try_fold(0u64, |acc, b| {
        let digit = digit_value(b)
            .ok_or_else(|| Error::encoding(format!("invalid base62 digit {:?}", char::from(b))))?;
        acc.checked_mul(62)
            .and_then(|acc| acc.checked_add(digit))
            .ok_or_else(|| Error::encoding(format!("base62 numeral {numeral:?} overflows 64 bits")))
    })
}

/// Re-render a hex identifier in base 62.
///
/// The numeric value is preserved and leading zeros disappear, so `"0001"`
/// and `"1"` encode alike. A failure here means an identifier that was
/// committed upstream is corrupt.
pub fn hex_to_base62(hex: &str) -> Result<String> {
    let value = parse_hex(hex).inspect_err(|e| {
        error!(identifier = %hex, error = %e, "identifier cannot be base62 encoded");
    })?;
    Ok(encode_u64(value))
}

/// Inverse of [`hex_to_base62`], zero-padded to `width` hex digits
pub fn base62_to_hex(numeral: &str, width: usize) -> Result<String> {
    let value = decode_u64(numeral)?;
    Ok(format!("{value:0width$x}"))
}

fn parse_hex(hex: &str) -> Result<u64> {
    if hex.is_empty() {
        return Err(Error::encoding("empty identifier"));
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::encoding(format!("{hex:?} is not a hex number")));
    }
    u64::from_str_radix(hex, 16)
        .map_err(|_| Error::encoding(format!("{hex:?} exceeds the 64-bit identifier range")))
}

fn digit_value(b: u8) -> Option<u64> {
    let value = match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'z' => b - b'a' + 10,
        b'A'..=b'Z' => b - b'A' + 36,
        _ => return None,
    };
    Some(u64::from(value))
}
