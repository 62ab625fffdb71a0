//! Parse-or-default numeric readers
//!
//! Backend records carry numbers as free text ("45.50", "120 km").
//! These readers take the longest numeric prefix, the same way a browser's
//! `parseFloat` / `parseInt` would, and report failure as `None` so callers
//! can fall back to zero explicitly.

use std::sync::LazyLock;

use regex::Regex;

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").expect("valid regex")
});

/// Longest leading decimal literal, ignoring leading whitespace.
///
/// ```
/// use tripstats::services::numeric::parse_float_prefix;
///
/// assert_eq!(parse_float_prefix("120 km"), Some(120.0));
/// assert_eq!(parse_float_prefix("1,275 km"), Some(1.0));
/// assert_eq!(parse_float_prefix("km"), None);
/// ```
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();

    for (literal, value) in [
        ("Infinity", f64::INFINITY),
        ("+Infinity", f64::INFINITY),
        ("-Infinity", f64::NEG_INFINITY),
    ] {
        if text.starts_with(literal) {
            return Some(value);
        }
    }

    let m = FLOAT_PREFIX.find(text)?;
    m.as_str().parse::<f64>().ok()
}

/// Finite leading decimal, or zero
pub fn parse_float_or_zero(text: &str) -> f64 {
    parse_float_prefix(text)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Leading base-10 integer, ignoring leading whitespace.
///
/// Stops at the first non-digit, so `"1.5"` reads as `1`.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
