//! Parsing of the `time` cells found in extracted tables.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a date, datetime or bare year. Returns `None` for anything else so
/// that the row can be dropped.
pub fn parse_time(cell: &str) -> Option<NaiveDate> {
    let s = cell.trim().trim_end_matches('Z');
    if s.is_empty() {
        return None;
    }

    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Converts an Arrow `Date32` day count.
pub fn from_epoch_days(days: i32) -> Option<NaiveDate> {
    epoch().checked_add_signed(Duration::days(days as i64))
}

/// Inverse of [`from_epoch_days`].
pub fn to_epoch_days(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

fn epoch() -> NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn should_parse_iso_date() {
        assert_eq!(parse_time("2020-06-15"), Some(date(2020, 6, 15)));
    }

    #[test]
    fn should_parse_day_first_date() {
        assert_eq!(parse_time("01/02/2019"), Some(date(2019, 2, 1)));
    }

    #[test]
    fn should_parse_datetime() {
        assert_eq!(parse_time("2021-12-31 00:00:00"), Some(date(2021, 12, 31)));
        assert_eq!(parse_time("2021-12-31T12:30:00.000Z"), Some(date(2021, 12, 31)));
    }

    #[test]
    fn should_parse_bare_year() {
        assert_eq!(parse_time("2023"), Some(date(2023, 1, 1)));
    }

    #[test]
    fn should_coerce_garbage_to_none() {
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("not a date"), None);
        assert_eq!(parse_time("31/02/2020"), None);
    }

    #[test]
    fn should_convert_epoch_days() {
        assert_eq!(from_epoch_days(0), Some(date(1970, 1, 1)));
        assert_eq!(from_epoch_days(18_262), Some(date(2020, 1, 1)));
        assert_eq!(to_epoch_days(date(2020, 1, 1)), 18_262);
    }
}
