//! Reveal gating for scheduled ("public") crawls.
//!
//! Each stop unlocks at the crawl start plus the running total of
//! `reveal_after_minutes` up to and including that stop. This differs from
//! stop windows, whose offset excludes the stop itself.

use super::format::format_time_remaining;
use crate::models::{is_public_mode, RevealState, StopDefinition, TimePoint};

/// Sum of reveal offsets for stops `0..=stop_index` (absent offsets count as 0).
pub fn cumulative_reveal_minutes(stops: &[StopDefinition], stop_index: usize) -> f64 {
    stops
        .iter()
        .take(stop_index.saturating_add(1))
        .filter_map(|s| s.reveal_after_minutes)
        .filter(|m| m.is_finite() && *m > 0.0)
        .sum()
}

/// When the stop at `stop_index` unlocks.
pub fn reveal_time(crawl_start: TimePoint, stop_index: usize, stops: &[StopDefinition]) -> TimePoint {
    let minutes = cumulative_reveal_minutes(stops, stop_index);
    crawl_start.plus_millis((minutes * 60_000.0).round() as i64)
}

pub fn is_available(reveal_time: TimePoint, now: TimePoint) -> bool {
    now >= reveal_time
}

/// Whole seconds until the reveal, rounded up; 0 once available.
pub fn seconds_until_reveal(reveal_time: TimePoint, now: TimePoint) -> u64 {
    let millis = now.millis_until(reveal_time);
    if millis <= 0 {
        0
    } else {
        (millis as u64).div_ceil(1000)
    }
}

/// Availability of the stop at `stop_index`. Crawls without any reveal
/// offsets are not gated.
pub fn reveal_state(
    crawl_start: TimePoint,
    stop_index: usize,
    stops: &[StopDefinition],
    now: TimePoint,
) -> RevealState {
    let stop_number = stops
        .get(stop_index)
        .map(|s| s.stop_number)
        .unwrap_or(stop_index as u32 + 1);

    if !is_public_mode(stops) {
        return RevealState::ungated(stop_number);
    }

    let unlock = reveal_time(crawl_start, stop_index, stops);
    let available = is_available(unlock, now);
    let seconds_remaining = seconds_until_reveal(unlock, now);

    RevealState {
        stop_number,
        reveal_time: Some(unlock),
        available,
        seconds_remaining,
        countdown: (!available).then(|| format_time_remaining(seconds_remaining)),
    }
}
