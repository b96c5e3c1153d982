//! Calendar helpers for dated rate snapshots.

use chrono::{Duration, NaiveDate, Utc};

/// Format used by the provider for snapshot dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Get today's calendar date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a date as `YYYY-MM-DD`.
pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
}

/// The `days` calendar dates ending at `end`, newest first:
/// `end, end - 1, ..., end - (days - 1)`.
pub fn trailing_days(end: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..i64::from(days))
        .map(|offset| end - Duration::days(offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_eq!(iso_date(date), "2024-03-06");
        assert_eq!(parse_iso_date("2024-03-06").unwrap(), date);
        assert!(parse_iso_date("06/03/2024").is_err());
    }

    #[test]
    fn test_trailing_days_descending() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let days: Vec<String> = trailing_days(end, 4).into_iter().map(iso_date).collect();

        // Crosses the leap day going backward
        assert_eq!(days, vec!["2024-03-02", "2024-03-01", "2024-02-29", "2024-02-28"]);
    }

    #[test]
    fn test_trailing_days_empty() {
        assert!(trailing_days(today(), 0).is_empty());
        assert_eq!(trailing_days(today(), 1), vec![today()]);
    }
}
