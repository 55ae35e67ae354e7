//! Number parsing and formatting with JavaScript semantics.
//!
//! Query values are parsed with `parseInt`/`parseFloat` on the client, which
//! accept the longest numeric prefix and ignore trailing garbage. `NaN` maps to
//! `None` here.

/// Strip leading whitespace as `parseInt`/`parseFloat` do.
fn trim_js_start(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn leading_digits(s: &str, radix: u32) -> usize {
    s.bytes().take_while(|b| char::from(*b).is_digit(radix)).count()
}

/// Parse an integer prefix like JavaScript's `parseInt(s)` with no radix.
///
/// A `0x`/`0X` prefix switches to hexadecimal. Values that do not fit in an
/// `i64` return `None`.
///
/// # Examples
///
/// ```
/// use query_state_util::parse_int;
///
/// assert_eq!(parse_int("42"), Some(42));
/// assert_eq!(parse_int("  -7px"), Some(-7));
/// assert_eq!(parse_int("0x1f"), Some(31));
/// assert_eq!(parse_int("1.9"), Some(1));
/// assert_eq!(parse_int("_"), None);
/// assert_eq!(parse_int(""), None);
/// ```
pub fn parse_int(s: &str) -> Option<i64> {
    let s = trim_js_start(s);
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, s) = if s.starts_with("0x") || s.starts_with("0X") {
        (16, &s[2..])
    } else {
        (10, s)
    };
    let len = leading_digits(s, radix);
    if len == 0 {
        return None;
    }
    let digits = &s[..len];
    if negative {
        i64::from_str_radix(&format!("-{digits}"), radix).ok()
    } else {
        i64::from_str_radix(digits, radix).ok()
    }
}

/// Parse a decimal prefix like JavaScript's `parseFloat(s)`.
///
/// # Examples
///
/// ```
/// use query_state_util::parse_float;
///
/// assert_eq!(parse_float("1.5"), Some(1.5));
/// assert_eq!(parse_float(".5eth"), Some(0.5));
/// assert_eq!(parse_float("2e3"), Some(2000.0));
/// assert_eq!(parse_float("-Infinity"), Some(f64::NEG_INFINITY));
/// assert_eq!(parse_float("abc"), None);
/// ```
pub fn parse_float(s: &str) -> Option<f64> {
    let s = trim_js_start(s);
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if s[sign..].starts_with("Infinity") {
        return Some(if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let mut end = sign;
    let int_digits = leading_digits(&s[end..], 10);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = leading_digits(&s[end + 1..], 10);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_digits = leading_digits(&s[exp_start..], 10);
        if exp_digits > 0 {
            end = exp_start + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Format a number the way JavaScript's `String(number)` does.
///
/// # Examples
///
/// ```
/// use query_state_util::format_number;
///
/// assert_eq!(format_number(2.0), "2");
/// assert_eq!(format_number(0.25), "0.25");
/// assert_eq!(format_number(1e21), "1e+21");
/// assert_eq!(format_number(1.5e-7), "1.5e-7");
/// ```
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }
    format!("{value}")
}
