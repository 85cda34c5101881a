//! Per-stop time windows.

use super::allocate::DurationAllocation;
use crate::models::{StopDefinition, StopTiming, TimePoint};

/// Window and flags for one stop.
///
/// The stop starts after every lower-numbered stop's allotment (its own
/// allotment excluded) and runs for its own allotment. It is active when it
/// is the current stop and `now` lies inside `[start, end]`, and completed
/// when it comes before the current stop.
pub fn get_stop_timing(
    stop_number: u32,
    crawl_start: TimePoint,
    allocation: &DurationAllocation,
    current_stop_index: usize,
    now: TimePoint,
) -> StopTiming {
    let offset = allocation.minutes_before(stop_number);
    let duration_minutes = allocation.minutes_for(stop_number);

    let start_time = crawl_start.plus_minutes(i64::try_from(offset).unwrap_or(i64::MAX));
    let end_time = start_time.plus_minutes(i64::try_from(duration_minutes).unwrap_or(i64::MAX));

    let current_stop_number = current_stop_index as u64 + 1;
    let is_current = u64::from(stop_number) == current_stop_number;

    StopTiming {
        stop_number,
        start_time,
        end_time,
        duration_minutes,
        is_active: is_current && start_time <= now && now <= end_time,
        is_completed: u64::from(stop_number) < current_stop_number,
    }
}

/// Timings for every stop in list order.
pub fn get_stop_timings(
    stops: &[StopDefinition],
    crawl_start: TimePoint,
    allocation: &DurationAllocation,
    current_stop_index: usize,
    now: TimePoint,
) -> Vec<StopTiming> {
    stops
        .iter()
        .map(|stop| {
            get_stop_timing(
                stop.stop_number,
                crawl_start,
                allocation,
                current_stop_index,
                now,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::allocate::allocate_minutes;
    use chrono::{TimeZone, Utc};

    fn at(h: u32, m: u32) -> TimePoint {
        TimePoint::from(Utc.with_ymd_and_hms(2025, 6, 15, h, m, 0).unwrap())
    }

    fn stops(n: u32) -> Vec<StopDefinition> {
        (1..=n).map(StopDefinition::new).collect()
    }

    #[test]
    fn test_windows_are_contiguous() {
        let stops = stops(4);
        let allocation = allocate_minutes(100, &stops);
        let timings = get_stop_timings(&stops, at(18, 0), &allocation, 0, at(18, 0));

        assert_eq!(timings[0].start_time, at(18, 0));
        assert_eq!(timings[0].end_time, at(18, 25));
        assert_eq!(timings[1].start_time, at(18, 25));
        assert_eq!(timings[3].end_time, at(19, 40));
        for pair in timings.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
    }

    #[test]
    fn test_active_requires_current_and_inside_window() {
        let stops = stops(3);
        let allocation = allocate_minutes(90, &stops);

        let timing = get_stop_timing(2, at(18, 0), &allocation, 1, at(18, 45));
        assert!(timing.is_active);
        assert!(!timing.is_completed);

        // current but outside its window
        let timing = get_stop_timing(2, at(18, 0), &allocation, 1, at(19, 5));
        assert!(!timing.is_active);

        // inside the window but not current
        let timing = get_stop_timing(2, at(18, 0), &allocation, 0, at(18, 45));
        assert!(!timing.is_active);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let stops = stops(3);
        let allocation = allocate_minutes(90, &stops);
        assert!(get_stop_timing(2, at(18, 0), &allocation, 1, at(18, 30)).is_active);
        assert!(get_stop_timing(2, at(18, 0), &allocation, 1, at(19, 0)).is_active);
    }

    #[test]
    fn test_completed_flags_stops_before_current() {
        let stops = stops(4);
        let allocation = allocate_minutes(120, &stops);
        let timings = get_stop_timings(&stops, at(18, 0), &allocation, 2, at(19, 10));
        let completed: Vec<bool> = timings.iter().map(|t| t.is_completed).collect();
        assert_eq!(completed, vec![true, true, false, false]);
        let active: Vec<bool> = timings.iter().map(|t| t.is_active).collect();
        assert_eq!(active, vec![false, false, true, false]);
    }

    #[test]
    fn test_zero_minute_stop_is_a_point() {
        let stops = stops(5);
        let allocation = allocate_minutes(3, &stops);
        let timing = get_stop_timing(4, at(18, 0), &allocation, 3, at(18, 3));
        assert_eq!(timing.start_time, timing.end_time);
        assert_eq!(timing.duration_minutes, 0);
        assert!(timing.is_active);

        let timing = get_stop_timing(4, at(18, 0), &allocation, 3, at(18, 4));
        assert!(!timing.is_active);
    }

    #[test]
    fn test_unknown_stop_has_empty_window_after_all_others() {
        let stops = stops(2);
        let allocation = allocate_minutes(60, &stops);
        let timing = get_stop_timing(9, at(18, 0), &allocation, 0, at(18, 0));
        assert_eq!(timing.start_time, at(19, 0));
        assert_eq!(timing.end_time, at(19, 0));
    }
}
