//! ASCII character classification.
//!
//! Locale-free predicates for the byte character set. The stream stack is
//! ASCII-only by contract, so classification is plain match logic rather
//! than a locale facet.

/// Spelling of `true` recognized and produced in boolalpha mode.
pub const TRUE_NAME: &[u8] = b"true";

/// Spelling of `false` recognized and produced in boolalpha mode.
pub const FALSE_NAME: &[u8] = b"false";

/// Whitespace per the C "space" class: space, tab, LF, VT, FF, CR.
pub fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Numeric value of `c` as a digit, for any base up to 36.
///
/// The caller checks the returned value against its base; `digit_value`
/// itself accepts the full alphanumeric range.
pub fn digit_value(c: u8) -> Option<u32> {
    match c {
        b'0'..=b'9' => Some(u32::from(c - b'0')),
        b'a'..=b'z' => Some(u32::from(c - b'a') + 10),
        b'A'..=b'Z' => Some(u32::from(c - b'A') + 10),
        _ => None,
    }
}
