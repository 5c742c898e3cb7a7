//! Date formats shared by storage, the wire protocol and search.

use chrono::{Datelike, NaiveDate};

use crate::error::CoreError;

/// Canonical storage and wire format: `YYYYMMDD`.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Dotted format accepted only as a search term: `DD.MM.YYYY`.
pub const SEARCH_DATE_FORMAT: &str = "%d.%m.%Y";

/// Last year that fits the four-digit year field of [`DATE_FORMAT`].
pub const MAX_YEAR: i32 = 9999;

/// Parses a date in the fixed 8-digit format.
///
/// Anything other than exactly eight ASCII digits naming a real calendar day
/// is rejected, so `2024011` or `2024-01-01` never slip through.
pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| CoreError::InvalidDate(value.to_string()))
}

/// Parses a `DD.MM.YYYY` search term, returning `None` for anything else.
pub fn parse_search_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        2 | 5 => *b == b'.',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(value, SEARCH_DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Adds whole years with calendar normalization: Feb 29 rolls over to Mar 1
/// when the target year has no leap day.
pub fn add_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    // Only Feb 29 can be missing from the target year.
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_valid() {
        assert_eq!(parse_date("20240229").unwrap(), ymd(2024, 2, 29));
    }

    #[rstest]
    #[case("")]
    #[case("2024011")]
    #[case("202401011")]
    #[case("2024-01-01")]
    #[case("20230229")]
    #[case("20241301")]
    #[case("2024010a")]
    fn test_parse_date_rejects(#[case] input: &str) {
        assert!(matches!(parse_date(input), Err(CoreError::InvalidDate(_))));
    }

    #[test]
    fn test_parse_search_date() {
        assert_eq!(parse_search_date("08.03.2024"), Some(ymd(2024, 3, 8)));
        assert_eq!(parse_search_date("8.03.2024"), None);
        assert_eq!(parse_search_date("31.02.2024"), None);
        assert_eq!(parse_search_date("groceries"), None);
        assert_eq!(parse_search_date("20240308"), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2024, 1, 5)), "20240105");
    }

    #[rstest]
    #[case(ymd(2024, 1, 1), ymd(2025, 1, 1))]
    #[case(ymd(2024, 2, 29), ymd(2025, 3, 1))]
    #[case(ymd(2023, 2, 28), ymd(2024, 2, 28))]
    #[case(ymd(2024, 12, 31), ymd(2025, 12, 31))]
    fn test_add_years(#[case] from: NaiveDate, #[case] expected: NaiveDate) {
        assert_eq!(add_years(from, 1), Some(expected));
    }
}
