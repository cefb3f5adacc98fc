//! Float digit production.
//!
//! Renders the digit body of a finite, non-negative double in fixed,
//! scientific, general, or hex notation. Sign and field padding are the
//! caller's business; this module only produces digits.

/// Non-finite spelling, without sign. `None` for finite values.
pub fn special(v: f64, upper: bool) -> Option<&'static str> {
    if v.is_nan() {
        Some(if upper { "NAN" } else { "nan" })
    } else if v.is_infinite() {
        Some(if upper { "INF" } else { "inf" })
    } else {
        None
    }
}

/// Fixed notation with `precision` fractional digits. `alt` keeps the
/// point even when the fraction is empty.
pub fn fixed(v: f64, precision: usize, alt: bool) -> String {
    let mut s = format!("{v:.precision$}");
    if precision == 0 && alt {
        s.push('.');
    }
    s
}

/// Scientific notation with a signed, at-least-two-digit exponent.
pub fn scientific(v: f64, precision: usize, upper: bool, alt: bool) -> String {
    let e_char = if upper { 'E' } else { 'e' };
    if v == 0.0 {
        let mut s = String::from("0");
        if precision > 0 {
            s.push('.');
            s.extend(core::iter::repeat_n('0', precision));
        } else if alt {
            s.push('.');
        }
        s.push(e_char);
        s.push_str("+00");
        return s;
    }

    let mut exp = v.log10().floor() as i32;
    let mut mantissa = v / 10f64.powi(exp);
    // Rounding the mantissa can carry it up to the next decade.
    if format!("{mantissa:.precision$}")
        .trim_start_matches('-')
        .starts_with("10")
    {
        mantissa /= 10.0;
        exp += 1;
    }
    let sign = if exp < 0 { '-' } else { '+' };
    let abs_exp = exp.unsigned_abs();
    let mut s = format!("{mantissa:.precision$}");
    if precision == 0 && alt {
        s.push('.');
    }
    s.push(e_char);
    s.push(sign);
    let _ = std::fmt::Write::write_fmt(&mut s, format_args!("{abs_exp:02}"));
    s
}

/// General notation: fixed for moderate exponents, scientific
/// otherwise, with trailing zeros stripped unless `alt` is set.
pub fn general(v: f64, precision: usize, upper: bool, alt: bool) -> String {
    let p = precision.max(1);

    if v == 0.0 {
        if alt {
            let mut s = String::from("0.");
            s.extend(core::iter::repeat_n('0', p.saturating_sub(1)));
            return s;
        }
        return String::from("0");
    }

    let exp = v.log10().floor() as i32;
    if (-4..p as i32).contains(&exp) {
        let frac_digits = (p as i32 - 1 - exp).max(0) as usize;
        let mut s = format!("{v:.frac_digits$}");
        if !alt {
            strip_trailing_zeros(&mut s);
        }
        s
    } else {
        let mut s = scientific(v, p - 1, upper, alt);
        if !alt
            && let Some(e_pos) = s.bytes().position(|b| b == b'e' || b == b'E')
        {
            let mut mantissa = s[..e_pos].to_string();
            strip_trailing_zeros(&mut mantissa);
            let exp_part = &s[e_pos..];
            s = format!("{mantissa}{exp_part}");
        }
        s
    }
}

/// Hex notation: `0x1.<frac>p<exp>` with the shortest mantissa, built
/// straight from the bit pattern.
pub fn hex_float(v: f64, upper: bool) -> String {
    const FRAC_MASK: u64 = (1u64 << 52) - 1;
    let bits = v.to_bits() & !(1u64 << 63);
    let exp_raw = ((bits >> 52) & 0x7ff) as i64;
    let frac = bits & FRAC_MASK;

    let (lead, exp) = if exp_raw == 0 {
        if frac == 0 {
            (0u8, 0i64)
        } else {
            (0u8, -1022i64)
        }
    } else {
        (1u8, exp_raw - 1023)
    };

    let mut mantissa = String::new();
    let mut f = frac;
    while f != 0 {
        let digit = ((f >> 48) & 0xf) as u32;
        mantissa.push(char::from_digit(digit, 16).unwrap_or('0'));
        f = (f << 4) & FRAC_MASK;
    }

    let sign = if exp < 0 { '-' } else { '+' };
    let s = if mantissa.is_empty() {
        format!("0x{lead}p{sign}{}", exp.unsigned_abs())
    } else {
        format!("0x{lead}.{mantissa}p{sign}{}", exp.unsigned_abs())
    };
    if upper { s.to_ascii_uppercase() } else { s }
}

fn strip_trailing_zeros(s: &mut String) {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
}
