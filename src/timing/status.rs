//! Crawl lifecycle classification.

use chrono::{DateTime, TimeZone};
use tracing::debug;

use super::allocate::{allocate, parse_duration_hours, DurationAllocation};
use super::format::format_time_remaining;
use super::parse::parse_time_string;
use crate::models::{CrawlStatus, StopDefinition, TimePoint};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Classify a crawl from its start time string, duration label and stops.
///
/// A missing or unparseable start time yields [`CrawlStatus::Unknown`].
pub fn calculate_crawl_status<Tz: TimeZone>(
    start_time: Option<&str>,
    duration: &str,
    stops: &[StopDefinition],
    now: &DateTime<Tz>,
) -> CrawlStatus {
    let Some(start_time) = start_time else {
        return CrawlStatus::Unknown;
    };

    match parse_time_string(start_time, now) {
        Ok(start) => status_from_start(start, duration, stops, TimePoint::from_datetime(now)),
        Err(e) => {
            debug!(start_time, error = %e, "Unusable start time, status unknown");
            CrawlStatus::Unknown
        }
    }
}

/// End of a crawl: start plus the advertised duration.
pub fn crawl_end(start: TimePoint, duration: &str) -> TimePoint {
    let hours = parse_duration_hours(duration);
    start.plus_millis((hours * MILLIS_PER_HOUR).round() as i64)
}

/// Classify a crawl whose start instant is already known.
pub fn status_from_start(
    start: TimePoint,
    duration: &str,
    stops: &[StopDefinition],
    now: TimePoint,
) -> CrawlStatus {
    let end = crawl_end(start, duration);

    if now < start {
        let seconds = start.millis_until(now).unsigned_abs() / 1000;
        return CrawlStatus::Upcoming {
            countdown: format_time_remaining(seconds),
        };
    }

    if now > end {
        return CrawlStatus::Completed;
    }

    let elapsed_minutes = start.millis_until(now) / 60_000;
    let allocation = allocate(duration, stops);

    CrawlStatus::Ongoing {
        elapsed: format_elapsed(elapsed_minutes),
        current_stop_index: current_stop_index(&allocation, stops, elapsed_minutes),
    }
}

/// Index of the stop in progress after `elapsed_minutes`.
///
/// Walks stops in list order; the first stop whose cumulative allotment
/// exceeds the elapsed time is current. Past the total, the last stop is
/// current. None only for an empty stop list.
pub fn current_stop_index(
    allocation: &DurationAllocation,
    stops: &[StopDefinition],
    elapsed_minutes: i64,
) -> Option<usize> {
    let last = stops.len().checked_sub(1)?;

    let elapsed_minutes = u64::try_from(elapsed_minutes).unwrap_or(0);
    let mut cumulative: u64 = 0;
    for (index, stop) in stops.iter().enumerate() {
        cumulative = cumulative.saturating_add(allocation.minutes_for(stop.stop_number));
        if cumulative > elapsed_minutes {
            return Some(index);
        }
    }

    Some(last)
}

/// "1h 5m in" or "12m in".
pub fn format_elapsed(elapsed_minutes: i64) -> String {
    let elapsed_minutes = elapsed_minutes.max(0);
    let hours = elapsed_minutes / 60;
    let minutes = elapsed_minutes % 60;
    if hours > 0 {
        format!("{}h {}m in", hours, minutes)
    } else {
        format!("{}m in", minutes)
    }
}
