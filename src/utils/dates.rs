use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::error::{AppError, AppResult};

/// Strict `YYYY-MM-DD` parsing for the `start`/`end` query params.
///
/// Validation happens before any storage access: bad formats and inverted
/// ranges never reach the database.
pub fn parse_date_range(start: &str, end: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;

    if start > end {
        return Err(AppError::BadRequest(
            "Start date must be before end date.".to_string(),
        ));
    }

    Ok((start, end))
}

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(
            "Invalid date format. Use YYYY-MM-DD format (e.g., 2025-01-01).".to_string(),
        )
    })
}

/// Instant bounds covering the inclusive day range: `[start 00:00, end + 1d)`.
/// Used to filter timestamptz columns by calendar day.
pub fn day_bounds(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let from = start.and_time(NaiveTime::MIN).and_utc();
    let to = end.and_time(NaiveTime::MIN).and_utc() + Duration::days(1);
    (from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_range() {
        let (start, end) = parse_date_range("2025-01-01", "2025-05-25").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 5, 25).unwrap());
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(matches!(
            parse_date_range("01-01-2025", "2025-05-25"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_date_range("2025-01-01", "not-a-date"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(matches!(
            parse_date_range("2025-05-25", "2025-01-01"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn single_day_range_is_allowed() {
        assert!(parse_date_range("2025-03-10", "2025-03-10").is_ok());
    }

    #[test]
    fn bounds_cover_whole_days() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();

        let (from, to) = day_bounds(start, end);
        assert_eq!(to - from, Duration::days(3));
        assert_eq!(from.to_rfc3339(), "2025-03-10T00:00:00+00:00");
    }
}
