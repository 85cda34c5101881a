//! Time string parsing.
//!
//! Two shapes are accepted:
//! - absolute timestamps `YYYY-MM-DD HH:MM[:SS]` (anything containing `-`)
//! - bare times of day `HH:MM[:SS]`, resolved to their next occurrence
//!
//! Both are interpreted in the timezone carried by `now`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use super::TimingError;
use crate::models::TimePoint;

const ABSOLUTE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const TIME_OF_DAY_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Parse a crawl start time relative to `now`.
///
/// A bare time of day at or before `now` rolls forward one calendar day.
pub fn parse_time_string<Tz: TimeZone>(
    text: &str,
    now: &DateTime<Tz>,
) -> Result<TimePoint, TimingError> {
    let text = text.trim();
    if text.contains('-') {
        parse_absolute(text, now)
    } else {
        parse_time_of_day(text, now)
    }
}

fn parse_absolute<Tz: TimeZone>(text: &str, now: &DateTime<Tz>) -> Result<TimePoint, TimingError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(TimePoint::from(dt));
    }

    ABSOLUTE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .and_then(|naive| localize(&now.timezone(), naive))
        .ok_or_else(|| TimingError::InvalidDate(text.to_string()))
}

fn parse_time_of_day<Tz: TimeZone>(
    text: &str,
    now: &DateTime<Tz>,
) -> Result<TimePoint, TimingError> {
    let time = TIME_OF_DAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| TimingError::InvalidDate(text.to_string()))?;

    let tz = now.timezone();
    let now_point = TimePoint::from_datetime(now);
    let today = now.date_naive();

    let candidate = on_date(&tz, today, time)
        .ok_or_else(|| TimingError::InvalidDate(text.to_string()))?;
    if candidate > now_point {
        return Ok(candidate);
    }

    today
        .succ_opt()
        .and_then(|tomorrow| on_date(&tz, tomorrow, time))
        .ok_or_else(|| TimingError::InvalidDate(text.to_string()))
}

fn on_date<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<TimePoint> {
    localize(tz, date.and_time(time))
}

/// Ambiguous local times (DST fall-back) take the earlier instant; times that
/// fall in a DST gap do not exist and fail.
fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<TimePoint> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| TimePoint::from_datetime(&dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 14, 30, 0).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> TimePoint {
        TimePoint::from(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
    }

    #[test]
    fn test_absolute_with_seconds() {
        let parsed = parse_time_string("2025-06-20 18:45:10", &now()).unwrap();
        assert_eq!(parsed, at(2025, 6, 20, 18, 45, 10));
    }

    #[test]
    fn test_absolute_without_seconds() {
        let parsed = parse_time_string("2025-06-20 18:45", &now()).unwrap();
        assert_eq!(parsed, at(2025, 6, 20, 18, 45, 0));
    }

    #[test]
    fn test_absolute_in_the_past_does_not_roll_forward() {
        let parsed = parse_time_string("2025-06-01 09:00", &now()).unwrap();
        assert_eq!(parsed, at(2025, 6, 1, 9, 0, 0));
    }

    #[test]
    fn test_absolute_rfc3339() {
        let parsed = parse_time_string("2025-06-20T18:45:00+02:00", &now()).unwrap();
        assert_eq!(parsed, at(2025, 6, 20, 16, 45, 0));
    }

    #[test]
    fn test_bare_time_later_today() {
        let parsed = parse_time_string("18:00", &now()).unwrap();
        assert_eq!(parsed, at(2025, 6, 15, 18, 0, 0));
    }

    #[test]
    fn test_bare_time_with_seconds() {
        let parsed = parse_time_string("18:00:30", &now()).unwrap();
        assert_eq!(parsed, at(2025, 6, 15, 18, 0, 30));
    }

    #[test]
    fn test_bare_time_already_past_rolls_to_tomorrow() {
        let parsed = parse_time_string("09:15", &now()).unwrap();
        assert_eq!(parsed, at(2025, 6, 16, 9, 15, 0));
    }

    #[test]
    fn test_bare_time_exactly_now_rolls_to_tomorrow() {
        let parsed = parse_time_string("14:30", &now()).unwrap();
        assert_eq!(parsed, at(2025, 6, 16, 14, 30, 0));
    }

    #[test]
    fn test_bare_time_roll_crosses_month_end() {
        let now = Utc.with_ymd_and_hms(2025, 6, 30, 23, 0, 0).unwrap();
        let parsed = parse_time_string("08:00", &now).unwrap();
        assert_eq!(parsed, at(2025, 7, 1, 8, 0, 0));
    }

    #[test]
    fn test_bare_time_uses_timezone_of_now() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = offset.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
        let parsed = parse_time_string("12:00", &now).unwrap();
        assert_eq!(parsed, at(2025, 6, 15, 10, 0, 0));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let parsed = parse_time_string("  18:00 ", &now()).unwrap();
        assert_eq!(parsed, at(2025, 6, 15, 18, 0, 0));
    }

    #[test]
    fn test_unparseable_inputs() {
        for input in ["", "soon", "25:00", "2025-13-01 10:00", "2025-06-20", "18h00"] {
            assert!(
                matches!(parse_time_string(input, &now()), Err(TimingError::InvalidDate(_))),
                "expected invalid date for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        let a = parse_time_string("09:15", &now()).unwrap();
        let b = parse_time_string("09:15", &now()).unwrap();
        assert_eq!(a, b);
    }
}
