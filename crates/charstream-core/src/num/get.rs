//! Numeric extraction.
//!
//! Pulls characters one at a time through the buffer's public interface
//! and accumulates values with overflow detected before each multiply:
//! once the magnitude passes `MAX / base` the result is saturated and
//! the remaining digits are consumed without accumulating. Out-of-range
//! values clamp to the type's limit and set FAIL; exhausting the input
//! sets EOF, possibly alongside FAIL.

use crate::ctype::{self, FALSE_NAME, TRUE_NAME};
use crate::ios::{FmtFlags, Iostate};
use crate::streambuf::StreamBuf;

/// Result of the shared integer scanner.
struct IntScan {
    neg: bool,
    mag: u64,
    overflow: bool,
    /// At least one digit (or a bare significant zero) was consumed.
    any: bool,
    /// Input ran out during the scan.
    eof: bool,
}

/// Integer base selected by the basefield bits; empty means sniff the
/// C-literal prefix.
fn base_of(flags: FmtFlags) -> u32 {
    let field = flags & FmtFlags::BASEFIELD;
    if field == FmtFlags::HEX {
        16
    } else if field == FmtFlags::OCT {
        8
    } else if field == FmtFlags::DEC {
        10
    } else {
        0
    }
}

fn scan_int(sb: &mut dyn StreamBuf, flags: FmtFlags) -> IntScan {
    let mut scan = IntScan {
        neg: false,
        mag: 0,
        overflow: false,
        any: false,
        eof: false,
    };
    let mut base = base_of(flags);

    let mut c = sb.sgetc();
    if let Some(s) = c
        && (s == b'+' || s == b'-')
    {
        scan.neg = s == b'-';
        sb.sbumpc();
        c = sb.sgetc();
    }

    // Leading zero: a significant digit on its own, or the start of a
    // 0x prefix when hex is selected or being sniffed.
    let mut found_zero = false;
    if (base == 0 || base == 16) && c == Some(b'0') {
        found_zero = true;
        sb.sbumpc();
        c = sb.sgetc();
        if let Some(x) = c
            && (x == b'x' || x == b'X')
        {
            sb.sbumpc();
            let after = sb.sgetc();
            let hex_follows = after
                .and_then(ctype::digit_value)
                .is_some_and(|d| d < 16);
            if hex_follows {
                base = 16;
                found_zero = false;
                c = after;
            } else {
                // Not a prefix after all: the zero stands alone and the
                // x goes back to the stream.
                sb.sputbackc(x);
                c = Some(x);
            }
        } else if base == 0 {
            base = 8;
        }
    }
    if base == 0 {
        base = 10;
    }

    let cutoff = u64::MAX / u64::from(base);
    let cutlim = u64::MAX % u64::from(base);
    let mut digits = 0usize;
    loop {
        let Some(ch) = c else {
            scan.eof = true;
            break;
        };
        let Some(d) = ctype::digit_value(ch).filter(|&d| d < base) else {
            break;
        };
        digits += 1;
        if !scan.overflow {
            if scan.mag > cutoff || (scan.mag == cutoff && u64::from(d) > cutlim) {
                scan.overflow = true;
            } else {
                scan.mag = scan.mag * u64::from(base) + u64::from(d);
            }
        }
        sb.sbumpc();
        c = sb.sgetc();
    }

    scan.any = digits > 0 || found_zero;
    scan
}

macro_rules! signed_get {
    ($(#[$meta:meta])* $name:ident, $t:ty) => {
        $(#[$meta])*
        pub fn $name(sb: &mut dyn StreamBuf, flags: FmtFlags) -> ($t, Iostate) {
            let scan = scan_int(sb, flags);
            let mut err = Iostate::GOOD;
            if scan.eof {
                err |= Iostate::EOF;
            }
            if !scan.any {
                return (0, err | Iostate::FAIL);
            }
            let max = <$t>::MAX as u64;
            // One extra step of magnitude is representable on the
            // negative side.
            let out_of_range = scan.overflow
                || (scan.neg && scan.mag > max + 1)
                || (!scan.neg && scan.mag > max);
            let value = if out_of_range {
                err |= Iostate::FAIL;
                if scan.neg { <$t>::MIN } else { <$t>::MAX }
            } else if scan.neg {
                scan.mag.wrapping_neg() as $t
            } else {
                scan.mag as $t
            };
            (value, err)
        }
    };
}

macro_rules! unsigned_get {
    ($(#[$meta:meta])* $name:ident, $t:ty) => {
        $(#[$meta])*
        pub fn $name(sb: &mut dyn StreamBuf, flags: FmtFlags) -> ($t, Iostate) {
            let scan = scan_int(sb, flags);
            let mut err = Iostate::GOOD;
            if scan.eof {
                err |= Iostate::EOF;
            }
            if !scan.any {
                return (0, err | Iostate::FAIL);
            }
            let max = <$t>::MAX as u64;
            let value = if scan.overflow || scan.mag > max {
                err |= Iostate::FAIL;
                <$t>::MAX
            } else if scan.neg {
                // A signed literal into an unsigned target wraps.
                (scan.mag as $t).wrapping_neg()
            } else {
                scan.mag as $t
            };
            (value, err)
        }
    };
}

signed_get! {
    /// Extract an `i16` honoring the basefield.
    get_i16, i16
}
signed_get! {
    /// Extract an `i32` honoring the basefield.
    get_i32, i32
}
signed_get! {
    /// Extract an `i64` honoring the basefield.
    get_i64, i64
}
unsigned_get! {
    /// Extract a `u16` honoring the basefield.
    get_u16, u16
}
unsigned_get! {
    /// Extract a `u32` honoring the basefield.
    get_u32, u32
}
unsigned_get! {
    /// Extract a `u64` honoring the basefield.
    get_u64, u64
}

/// Extract a bool: the literal names under boolalpha, otherwise a
/// numeric 0 or 1 (anything else stores `true` and fails).
pub fn get_bool(sb: &mut dyn StreamBuf, flags: FmtFlags) -> (bool, Iostate) {
    if flags.contains(FmtFlags::BOOLALPHA) {
        match sb.sgetc() {
            Some(b't') => match_name(sb, TRUE_NAME, true),
            Some(b'f') => match_name(sb, FALSE_NAME, false),
            Some(_) => (false, Iostate::FAIL),
            None => (false, Iostate::EOF | Iostate::FAIL),
        }
    } else {
        let (v, mut err) = get_i64(sb, flags);
        match v {
            0 => (false, err),
            1 => (true, err),
            _ => {
                err |= Iostate::FAIL;
                (true, err)
            }
        }
    }
}

fn match_name(sb: &mut dyn StreamBuf, name: &[u8], value: bool) -> (bool, Iostate) {
    for &expected in name {
        match sb.sgetc() {
            Some(c) if c == expected => {
                sb.sbumpc();
            }
            Some(_) => return (false, Iostate::FAIL),
            None => return (false, Iostate::EOF | Iostate::FAIL),
        }
    }
    (value, Iostate::GOOD)
}

/// Extract an `f64`.
///
/// Collects one floating literal token (sign, digits, one point, one
/// exponent) and delegates conversion to the platform parser. A token
/// with a malformed exponent tail converts to 0.0 with FAIL.
pub fn get_f64(sb: &mut dyn StreamBuf, flags: FmtFlags) -> (f64, Iostate) {
    let _ = flags;
    let mut tok = String::new();
    let mut any = false;
    let mut c = sb.sgetc();

    if let Some(s) = c
        && (s == b'+' || s == b'-')
    {
        tok.push(s as char);
        sb.sbumpc();
        c = sb.sgetc();
    }
    while let Some(d) = c.filter(u8::is_ascii_digit) {
        tok.push(d as char);
        any = true;
        sb.sbumpc();
        c = sb.sgetc();
    }
    if c == Some(b'.') {
        tok.push('.');
        sb.sbumpc();
        c = sb.sgetc();
        while let Some(d) = c.filter(u8::is_ascii_digit) {
            tok.push(d as char);
            any = true;
            sb.sbumpc();
            c = sb.sgetc();
        }
    }
    if any
        && let Some(e) = c
        && (e == b'e' || e == b'E')
    {
        tok.push(e as char);
        sb.sbumpc();
        c = sb.sgetc();
        if let Some(s) = c
            && (s == b'+' || s == b'-')
        {
            tok.push(s as char);
            sb.sbumpc();
            c = sb.sgetc();
        }
        while let Some(d) = c.filter(u8::is_ascii_digit) {
            tok.push(d as char);
            sb.sbumpc();
            c = sb.sgetc();
        }
    }

    let mut err = Iostate::GOOD;
    if c.is_none() {
        err |= Iostate::EOF;
    }
    if !any {
        return (0.0, err | Iostate::FAIL);
    }
    match tok.parse::<f64>() {
        Ok(v) => (v, err),
        Err(_) => (0.0, err | Iostate::FAIL),
    }
}

/// Extract an `f32` through the `f64` path.
pub fn get_f32(sb: &mut dyn StreamBuf, flags: FmtFlags) -> (f32, Iostate) {
    let (v, err) = get_f64(sb, flags);
    (v as f32, err)
}

/// Extract a pointer-sized value: always hexadecimal, whatever the
/// basefield says.
pub fn get_ptr(sb: &mut dyn StreamBuf, flags: FmtFlags) -> (usize, Iostate) {
    let forced = (flags & !FmtFlags::BASEFIELD) | FmtFlags::HEX;
    let (v, err) = get_u64(sb, forced);
    (v as usize, err)
}
