//! Timestamp helpers.
//!
//! Stored timestamps are RFC 3339 with millisecond precision and a `Z`
//! suffix, so string comparison matches chronological order everywhere
//! (the summary-cache expiry filter depends on this).

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

/// Current time as a stored timestamp.
pub fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A timestamp `days` days from now.
pub fn days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp (or bare date) into a calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_comparable_and_z_suffixed() {
        let a = now();
        let b = days_from_now(7);
        assert!(a < b);
        assert!(a.ends_with('Z'));
    }

    #[test]
    fn test_parse_date_accepts_both_forms() {
        assert_eq!(
            parse_date("2026-01-02T10:30:00.000Z"),
            NaiveDate::from_ymd_opt(2026, 1, 2)
        );
        assert_eq!(parse_date("2026-01-02"), NaiveDate::from_ymd_opt(2026, 1, 2));
        assert_eq!(parse_date("not a date"), None);
    }
}
