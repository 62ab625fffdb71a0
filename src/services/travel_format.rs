//! Distance and duration text for travel cards
//!
//! Travel legs store distance ("1,275 km") and duration ("12 hours 25 mins")
//! as human-readable strings. These helpers recover meters and minutes from
//! them and format the numbers back for display. The parsing is a
//! best-effort heuristic, not a unit parser.

use std::sync::LazyLock;

use regex::Regex;

use super::numeric::{parse_float_prefix, parse_int_prefix};

static KILOMETERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)km").expect("valid regex"));

/// A bare "m" that is not the start of "min" or "mi(le)"
static METERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)m(?:[^ai]|$)").expect("valid regex"));

static HOURS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9,.]+)\s*(h|hour)").expect("valid regex"));

static MINUTES_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9,.]+)\s*(m|min)").expect("valid regex"));

/// Parse a distance string into meters.
///
/// Every character except digits and dots is dropped to get the magnitude;
/// the unit is then guessed from the original text: "km" scales by 1000,
/// a bare "m" is meters, anything else is taken as-is.
///
/// ```
/// use tripstats::services::travel_format::parse_distance;
///
/// assert_eq!(parse_distance(Some("1,275KM")), 1_275_000);
/// assert_eq!(parse_distance(Some("500m")), 500);
/// assert_eq!(parse_distance(None), 0);
/// ```
pub fn parse_distance(text: Option<&str>) -> u64 {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return 0;
    };

    let magnitude: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let Some(value) = parse_float_prefix(&magnitude).filter(|v| v.is_finite()) else {
        return 0;
    };

    let meters = match DistanceUnit::detect(text) {
        DistanceUnit::Kilometers => value * 1000.0,
        DistanceUnit::Meters => value,
        DistanceUnit::Unspecified => value,
    };

    meters.round() as u64
}

/// Unit guessed from a distance string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Kilometers,
    Meters,
    /// No recognizable unit, including miles
    Unspecified,
}

impl DistanceUnit {
    /// "km" wins over a bare "m"; "min" and "mi" never count as meters
    pub fn detect(text: &str) -> Self {
        if KILOMETERS.is_match(text) {
            Self::Kilometers
        } else if METERS.is_match(text) {
            Self::Meters
        } else {
            Self::Unspecified
        }
    }
}

/// Parse a duration string into minutes.
///
/// Hour and minute tokens are found independently and summed, so
/// "1h 30m", "12 hours 25 mins" and "45 min" all work.
pub fn parse_duration(text: Option<&str>) -> u64 {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return 0;
    };

    let hours = token_value(&HOURS_TOKEN, text);
    let minutes = token_value(&MINUTES_TOKEN, text);

    hours.saturating_mul(60).saturating_add(minutes)
}

/// Integer captured by the token's first group, commas removed; 0 if unreadable
fn token_value(token: &Regex, text: &str) -> u64 {
    token
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_int_prefix(&m.as_str().replace(',', "")))
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(0)
}

/// Format meters as whole kilometers, e.g. `"1,275 KM"`
pub fn format_distance(meters: u64) -> String {
    let km = (meters as f64 / 1000.0).round() as u64;
    format!("{} KM", format_thousands(km))
}

/// Format minutes as `"{h}h {m}min"`; both parts are always present
pub fn format_duration(minutes: u64) -> String {
    format!("{}h {}min", minutes / 60, minutes % 60)
}

/// Group digits in threes with commas
pub fn format_thousands(n: u64) -> String {
    let digits: Vec<char> = n.to_string().chars().collect();
    digits
        .rchunks(3)
        .rev()
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
}
