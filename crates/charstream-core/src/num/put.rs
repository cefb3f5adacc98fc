//! Numeric insertion.
//!
//! Renders values to byte vectors under the stream format flags: base
//! and base prefix, sign, notation, and field padding with the three
//! justification modes. Digits come out least-significant first and are
//! reversed in place before assembly.

use crate::ctype::{FALSE_NAME, TRUE_NAME};
use crate::ios::FmtFlags;
use crate::num::ftoa;

/// Digit characters of `value` in `base`, most significant first.
fn digits_of(mut value: u64, base: u64, uppercase: bool) -> Vec<u8> {
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut out = Vec::with_capacity(24);
    loop {
        let d = (value % base) as u8;
        out.push(if d < 10 { b'0' + d } else { alpha + (d - 10) });
        value /= base;
        if value == 0 {
            break;
        }
    }
    out.reverse();
    out
}

/// Assemble sign, base prefix, and digit body into a padded field.
///
/// Internal justification inserts the fill between the prefix and the
/// body, which is what puts zeros after `-` or `0x` instead of before.
fn pad_field(
    sign: Option<u8>,
    prefix: &[u8],
    body: &[u8],
    flags: FmtFlags,
    width: usize,
    fill: u8,
) -> Vec<u8> {
    let content = usize::from(sign.is_some()) + prefix.len() + body.len();
    let padding = width.saturating_sub(content);
    let mut out = Vec::with_capacity(content + padding);
    let adjust = flags & FmtFlags::ADJUSTFIELD;

    if adjust == FmtFlags::LEFT {
        if let Some(s) = sign {
            out.push(s);
        }
        out.extend_from_slice(prefix);
        out.extend_from_slice(body);
        out.resize(out.len() + padding, fill);
    } else if adjust == FmtFlags::INTERNAL {
        if let Some(s) = sign {
            out.push(s);
        }
        out.extend_from_slice(prefix);
        out.resize(out.len() + padding, fill);
        out.extend_from_slice(body);
    } else {
        out.resize(padding, fill);
        if let Some(s) = sign {
            out.push(s);
        }
        out.extend_from_slice(prefix);
        out.extend_from_slice(body);
    }
    out
}

fn base_of(flags: FmtFlags) -> u64 {
    let field = flags & FmtFlags::BASEFIELD;
    if field == FmtFlags::HEX {
        16
    } else if field == FmtFlags::OCT {
        8
    } else {
        10
    }
}

/// Base prefix under showbase. Zero never gets one: `0x0` would print
/// a prefix for a value with no hex digits to own it, and octal zero is
/// already its own prefix.
fn base_prefix(base: u64, value: u64, flags: FmtFlags) -> &'static [u8] {
    if !flags.contains(FmtFlags::SHOWBASE) || value == 0 {
        return b"";
    }
    match base {
        8 => b"0",
        16 => {
            if flags.contains(FmtFlags::UPPERCASE) {
                b"0X"
            } else {
                b"0x"
            }
        }
        _ => b"",
    }
}

fn format_magnitude(
    mag: u64,
    neg: bool,
    flags: FmtFlags,
    width: usize,
    fill: u8,
) -> Vec<u8> {
    let base = base_of(flags);
    let body = digits_of(mag, base, flags.contains(FmtFlags::UPPERCASE));
    let sign = if base != 10 {
        None
    } else if neg {
        Some(b'-')
    } else if flags.contains(FmtFlags::SHOWPOS) {
        Some(b'+')
    } else {
        None
    };
    let prefix = base_prefix(base, mag, flags);
    pad_field(sign, prefix, &body, flags, width, fill)
}

/// Render an `i64`. Non-decimal bases show the two's-complement bit
/// pattern, unsigned, as the classic inserters do.
pub fn format_i64(v: i64, flags: FmtFlags, width: usize, fill: u8) -> Vec<u8> {
    if base_of(flags) == 10 {
        format_magnitude(v.unsigned_abs(), v < 0, flags, width, fill)
    } else {
        format_magnitude(v as u64, false, flags, width, fill)
    }
}

pub fn format_u64(v: u64, flags: FmtFlags, width: usize, fill: u8) -> Vec<u8> {
    format_magnitude(v, false, flags, width, fill)
}

/// Render an `i32`; hex and octal use the 32-bit pattern, not a
/// sign-extended one.
pub fn format_i32(v: i32, flags: FmtFlags, width: usize, fill: u8) -> Vec<u8> {
    if base_of(flags) == 10 {
        format_i64(i64::from(v), flags, width, fill)
    } else {
        format_u64(u64::from(v as u32), flags, width, fill)
    }
}

pub fn format_u32(v: u32, flags: FmtFlags, width: usize, fill: u8) -> Vec<u8> {
    format_u64(u64::from(v), flags, width, fill)
}

/// Render an `i16`; hex and octal use the 16-bit pattern.
pub fn format_i16(v: i16, flags: FmtFlags, width: usize, fill: u8) -> Vec<u8> {
    if base_of(flags) == 10 {
        format_i64(i64::from(v), flags, width, fill)
    } else {
        format_u64(u64::from(v as u16), flags, width, fill)
    }
}

pub fn format_u16(v: u16, flags: FmtFlags, width: usize, fill: u8) -> Vec<u8> {
    format_u64(u64::from(v), flags, width, fill)
}

/// Render a bool: literal name under boolalpha, digit otherwise.
pub fn format_bool(v: bool, flags: FmtFlags, width: usize, fill: u8) -> Vec<u8> {
    if flags.contains(FmtFlags::BOOLALPHA) {
        let name = if v { TRUE_NAME } else { FALSE_NAME };
        pad_field(None, b"", name, flags, width, fill)
    } else {
        format_u64(u64::from(v), flags, width, fill)
    }
}

/// Render an `f64` under the floatfield: fixed, scientific, hexfloat
/// when both bits are set, general when neither is.
pub fn format_f64(v: f64, flags: FmtFlags, width: usize, precision: usize, fill: u8) -> Vec<u8> {
    let upper = flags.contains(FmtFlags::UPPERCASE);
    let neg = v.is_sign_negative() && !v.is_nan();
    let sign = if neg {
        Some(b'-')
    } else if flags.contains(FmtFlags::SHOWPOS) {
        Some(b'+')
    } else {
        None
    };

    if let Some(s) = ftoa::special(v, upper) {
        // Specials ignore internal adjustment; pad like text.
        let text_flags = if (flags & FmtFlags::ADJUSTFIELD) == FmtFlags::LEFT {
            flags
        } else {
            flags & !FmtFlags::ADJUSTFIELD
        };
        return pad_field(sign, b"", s.as_bytes(), text_flags, width, fill);
    }

    let alt = flags.contains(FmtFlags::SHOWPOINT);
    let abs = v.abs();
    let field = flags & FmtFlags::FLOATFIELD;
    let body = if field == FmtFlags::FLOATFIELD {
        ftoa::hex_float(abs, upper)
    } else if field == FmtFlags::FIXED {
        ftoa::fixed(abs, precision, alt)
    } else if field == FmtFlags::SCIENTIFIC {
        ftoa::scientific(abs, precision, upper, alt)
    } else {
        ftoa::general(abs, precision, upper, alt)
    };
    pad_field(sign, b"", body.as_bytes(), flags, width, fill)
}

pub fn format_f32(v: f32, flags: FmtFlags, width: usize, precision: usize, fill: u8) -> Vec<u8> {
    format_f64(f64::from(v), flags, width, precision, fill)
}

/// Render a pointer-sized value: always hex with a prefix, whatever the
/// basefield says. Null prints as a bare 0.
pub fn format_ptr(p: usize, flags: FmtFlags, width: usize, fill: u8) -> Vec<u8> {
    let forced = (flags & !FmtFlags::BASEFIELD) | FmtFlags::HEX | FmtFlags::SHOWBASE;
    format_u64(p as u64, forced, width, fill)
}

/// Pad a plain byte string into a field. Strings only justify left or
/// right; internal behaves as right.
pub fn pad_text(text: &[u8], flags: FmtFlags, width: usize, fill: u8) -> Vec<u8> {
    let text_flags = if (flags & FmtFlags::ADJUSTFIELD) == FmtFlags::LEFT {
        flags
    } else {
        flags & !FmtFlags::ADJUSTFIELD
    };
    pad_field(None, b"", text, text_flags, width, fill)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec() -> FmtFlags {
        FmtFlags::DEC | FmtFlags::SKIPWS
    }

    fn s(v: Vec<u8>) -> String {
        String::from_utf8(v).unwrap()
    }

    #[test]
    fn test_plain_decimal() {
        assert_eq!(s(format_i64(42, dec(), 0, b' ')), "42");
        assert_eq!(s(format_i64(-42, dec(), 0, b' ')), "-42");
        assert_eq!(s(format_i64(0, dec(), 0, b' ')), "0");
    }

    #[test]
    fn test_showpos_only_in_decimal() {
        let f = dec() | FmtFlags::SHOWPOS;
        assert_eq!(s(format_i64(42, f, 0, b' ')), "+42");
        let hex = (f & !FmtFlags::BASEFIELD) | FmtFlags::HEX;
        assert_eq!(s(format_i64(42, hex, 0, b' ')), "2a");
    }

    #[test]
    fn test_hex_negative_uses_bit_pattern() {
        let hex = (dec() & !FmtFlags::BASEFIELD) | FmtFlags::HEX;
        assert_eq!(s(format_i32(-1, hex, 0, b' ')), "ffffffff");
        assert_eq!(s(format_i64(-1, hex, 0, b' ')), "ffffffffffffffff");
    }

    #[test]
    fn test_short_bases_use_16_bit_pattern() {
        let hex = (dec() & !FmtFlags::BASEFIELD) | FmtFlags::HEX;
        assert_eq!(s(format_i16(-1, hex, 0, b' ')), "ffff");
        let oct = (dec() & !FmtFlags::BASEFIELD) | FmtFlags::OCT;
        assert_eq!(s(format_i16(-1, oct, 0, b' ')), "177777");
        assert_eq!(s(format_i16(-1, dec(), 0, b' ')), "-1");
    }

    #[test]
    fn test_digit_order_on_long_renders() {
        assert_eq!(s(format_u64(u64::MAX, dec(), 0, b' ')), "18446744073709551615");
        let oct = (dec() & !FmtFlags::BASEFIELD) | FmtFlags::OCT;
        assert_eq!(s(format_u64(0o1234567, oct, 0, b' ')), "1234567");
    }

    #[test]
    fn test_showbase_prefixes() {
        let hex = (dec() & !FmtFlags::BASEFIELD) | FmtFlags::HEX | FmtFlags::SHOWBASE;
        assert_eq!(s(format_u64(255, hex, 0, b' ')), "0xff");
        assert_eq!(s(format_u64(255, hex | FmtFlags::UPPERCASE, 0, b' ')), "0XFF");
        // zero never gets a prefix
        assert_eq!(s(format_u64(0, hex, 0, b' ')), "0");

        let oct = (dec() & !FmtFlags::BASEFIELD) | FmtFlags::OCT | FmtFlags::SHOWBASE;
        assert_eq!(s(format_u64(8, oct, 0, b' ')), "010");
        assert_eq!(s(format_u64(0, oct, 0, b' ')), "0");
    }

    #[test]
    fn test_width_right_default() {
        assert_eq!(s(format_i64(42, dec(), 6, b' ')), "    42");
        assert_eq!(s(format_i64(42, dec(), 6, b'.')), "....42");
    }

    #[test]
    fn test_width_left() {
        let f = dec() | FmtFlags::LEFT;
        assert_eq!(s(format_i64(42, f, 6, b' ')), "42    ");
    }

    #[test]
    fn test_width_internal_fills_after_sign_and_prefix() {
        let f = dec() | FmtFlags::INTERNAL;
        assert_eq!(s(format_i64(-42, f, 6, b'0')), "-00042");

        let hex = (dec() & !FmtFlags::BASEFIELD)
            | FmtFlags::HEX
            | FmtFlags::SHOWBASE
            | FmtFlags::INTERNAL;
        assert_eq!(s(format_u64(255, hex, 8, b'0')), "0x0000ff");
    }

    #[test]
    fn test_width_shorter_than_content_is_ignored() {
        assert_eq!(s(format_i64(-1234, dec(), 2, b' ')), "-1234");
    }

    #[test]
    fn test_bool() {
        assert_eq!(s(format_bool(true, dec(), 0, b' ')), "1");
        let alpha = dec() | FmtFlags::BOOLALPHA;
        assert_eq!(s(format_bool(true, alpha, 0, b' ')), "true");
        assert_eq!(s(format_bool(false, alpha, 7, b' ')), "  false");
    }

    #[test]
    fn test_float_default_is_general() {
        assert_eq!(s(format_f64(100.0, dec(), 0, 6, b' ')), "100");
        assert_eq!(s(format_f64(-2.5, dec(), 0, 6, b' ')), "-2.5");
    }

    #[test]
    fn test_float_fixed_and_scientific() {
        let fx = dec() | FmtFlags::FIXED;
        assert_eq!(s(format_f64(3.14159, fx, 0, 2, b' ')), "3.14");
        let sc = dec() | FmtFlags::SCIENTIFIC;
        assert_eq!(s(format_f64(1500.0, sc, 0, 2, b' ')), "1.50e+03");
    }

    #[test]
    fn test_float_hexfloat() {
        let hf = dec() | FmtFlags::FIXED | FmtFlags::SCIENTIFIC;
        assert_eq!(s(format_f64(1.5, hf, 0, 6, b' ')), "0x1.8p+0");
    }

    #[test]
    fn test_float_specials() {
        assert_eq!(s(format_f64(f64::NAN, dec(), 0, 6, b' ')), "nan");
        assert_eq!(s(format_f64(f64::NEG_INFINITY, dec(), 0, 6, b' ')), "-inf");
        let up = dec() | FmtFlags::UPPERCASE;
        assert_eq!(s(format_f64(f64::INFINITY, up, 5, 6, b' ')), "  INF");
    }

    #[test]
    fn test_float_showpos_and_internal() {
        let f = dec() | FmtFlags::SHOWPOS | FmtFlags::INTERNAL | FmtFlags::FIXED;
        assert_eq!(s(format_f64(2.5, f, 8, 2, b'0')), "+0002.50");
    }

    #[test]
    fn test_ptr() {
        assert_eq!(s(format_ptr(0x2a, dec(), 0, b' ')), "0x2a");
        assert_eq!(s(format_ptr(0, dec(), 0, b' ')), "0");
    }

    #[test]
    fn test_pad_text() {
        assert_eq!(s(pad_text(b"hi", dec(), 5, b' ')), "   hi");
        let left = dec() | FmtFlags::LEFT;
        assert_eq!(s(pad_text(b"hi", left, 5, b' ')), "hi   ");
        // internal falls back to right for text
        let internal = dec() | FmtFlags::INTERNAL;
        assert_eq!(s(pad_text(b"hi", internal, 5, b' ')), "   hi");
    }
}
