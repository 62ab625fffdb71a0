//! Date parsing and stay-length helpers
//!
//! Trip dates are compared as local wall-clock times. Date-only strings
//! ("2024-05-01") denote local midnight; strings with an explicit offset are
//! converted into the local timezone first.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

const MS_PER_DAY: f64 = 86_400_000.0;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO date or datetime into local wall-clock time
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Both ends of a range, when both are present and parseable
pub fn parse_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    Some((parse_date(start?)?, parse_date(end?)?))
}

/// Nights between check-in and check-out, `None` if either date is unreadable.
///
/// Rounds to the nearest whole day and never goes below one night.
pub fn nights_between(check_in: &str, check_out: &str) -> Option<i64> {
    let check_in = parse_date(check_in)?;
    let check_out = parse_date(check_out)?;
    let days = (check_out - check_in).num_milliseconds() as f64 / MS_PER_DAY;
    Some((days.round() as i64).max(1))
}

/// Stay length in nights, at least 1.
///
/// Same-day and inverted ranges count as one night, as do unreadable dates.
///
/// ```
/// use tripstats::services::dates::get_nights;
///
/// assert_eq!(get_nights("2024-01-01", "2024-01-03"), 2);
/// assert_eq!(get_nights("2024-01-03", "2024-01-01"), 1);
/// ```
pub fn get_nights(check_in: &str, check_out: &str) -> i64 {
    nights_between(check_in, check_out).unwrap_or(1)
}

/// Midnight at the start of `now`'s calendar day
pub fn start_of_day(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(NaiveTime::MIN)
}

/// Current local wall-clock time
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    // ========== parse_date ==========

    #[test]
    fn test_parse_date_only() {
        assert_eq!(parse_date("2024-01-15"), Some(ymd_hms(2024, 1, 15, 0, 0, 0)));
    }

    #[test]
    fn test_parse_naive_datetime() {
        assert_eq!(
            parse_date("2024-01-15T10:30:00"),
            Some(ymd_hms(2024, 1, 15, 10, 30, 0))
        );
        assert_eq!(
            parse_date("2024-01-15T10:30"),
            Some(ymd_hms(2024, 1, 15, 10, 30, 0))
        );
        assert_eq!(
            parse_date("2024-01-15 08:05:09.250"),
            Some(
                NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_milli_opt(8, 5, 9, 250)
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_parse_rfc3339_converts_to_local() {
        let expected = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parse_date("2024-01-15T10:30:00Z"), Some(expected));
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn test_parse_range_requires_both() {
        assert!(parse_range(Some("2024-01-01"), Some("2024-01-05")).is_some());
        assert!(parse_range(Some("2024-01-01"), None).is_none());
        assert!(parse_range(None, Some("2024-01-05")).is_none());
        assert!(parse_range(Some("2024-01-01"), Some("bad")).is_none());
    }

    // ========== get_nights ==========

    #[test]
    fn test_nights_basic() {
        assert_eq!(get_nights("2024-01-01", "2024-01-03"), 2);
        assert_eq!(get_nights("2024-01-28", "2024-02-04"), 7);
    }

    #[test]
    fn test_nights_same_day_is_one() {
        assert_eq!(get_nights("2024-06-10", "2024-06-10"), 1);
    }

    #[test]
    fn test_nights_inverted_is_one() {
        assert_eq!(get_nights("2024-06-10", "2024-06-01"), 1);
    }

    #[test]
    fn test_nights_rounds_to_nearest_day() {
        // 1 day 14 hours rounds up
        assert_eq!(get_nights("2024-03-01T10:00", "2024-03-03T00:00"), 2);
        // 2 days 11 hours rounds down
        assert_eq!(get_nights("2024-03-01T00:00", "2024-03-03T11:00"), 2);
        // Exactly half a day past rounds up
        assert_eq!(get_nights("2024-03-01T00:00", "2024-03-03T12:00"), 3);
    }

    #[test]
    fn test_nights_unreadable_dates() {
        assert_eq!(nights_between("garbage", "2024-01-03"), None);
        assert_eq!(get_nights("garbage", "2024-01-03"), 1);
    }

    #[test]
    fn test_nights_never_below_one() {
        let dates = ["2023-12-31", "2024-01-01", "2024-02-29", "2024-03-01", "2025-07-04"];
        for a in dates {
            for b in dates {
                assert!(get_nights(a, b) >= 1, "{} -> {}", a, b);
            }
        }
    }

    // ========== start_of_day ==========

    #[test]
    fn test_start_of_day() {
        assert_eq!(
            start_of_day(ymd_hms(2024, 5, 3, 17, 45, 12)),
            ymd_hms(2024, 5, 3, 0, 0, 0)
        );
    }
}
