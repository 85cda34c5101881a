//! Split a crawl's advertised duration across its stops.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::models::StopDefinition;

/// Used when the duration label carries no "N hours".
pub const DEFAULT_DURATION_HOURS: f64 = 2.0;

fn hours_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*hours?").expect("hours pattern is valid")
    })
}

/// Extract total hours from a label like "2.5 hours", falling back to
/// [`DEFAULT_DURATION_HOURS`].
pub fn parse_duration_hours(label: &str) -> f64 {
    let parsed = hours_pattern()
        .captures(label)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok());

    match parsed {
        Some(hours) => hours,
        None => {
            debug!(label, "No hours in duration label, using default");
            DEFAULT_DURATION_HOURS
        }
    }
}

/// Whole minutes in `hours`, floored. Saturates at `u64::MAX`.
pub fn total_minutes(hours: f64) -> u64 {
    (hours * 60.0).floor() as u64
}

/// Minutes allotted to each stop, keyed by stop number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationAllocation {
    minutes: BTreeMap<u32, u64>,
}

impl DurationAllocation {
    /// Minutes allotted to a stop; 0 for stops not in the allocation.
    pub fn minutes_for(&self, stop_number: u32) -> u64 {
        self.minutes.get(&stop_number).copied().unwrap_or(0)
    }

    /// Sum over stops numbered strictly below `stop_number`.
    pub fn minutes_before(&self, stop_number: u32) -> u64 {
        self.minutes
            .range(..stop_number)
            .map(|(_, &m)| m)
            .sum()
    }

    pub fn total_minutes(&self) -> u64 {
        self.minutes.values().sum()
    }

    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.minutes.iter().map(|(&n, &m)| (n, m))
    }
}

/// Allocate the crawl's total minutes across `stops`.
pub fn allocate(duration_label: &str, stops: &[StopDefinition]) -> DurationAllocation {
    allocate_minutes(total_minutes(parse_duration_hours(duration_label)), stops)
}

/// Every stop gets `total / n`; the first `total % n` stops by list position
/// get one extra minute, so the allocation sums to `total` exactly.
pub fn allocate_minutes(total: u64, stops: &[StopDefinition]) -> DurationAllocation {
    let mut allocation = DurationAllocation::default();
    if stops.is_empty() {
        return allocation;
    }

    let count = stops.len() as u64;
    let per_stop = total / count;
    let remainder = (total % count) as usize;

    for (position, stop) in stops.iter().enumerate() {
        let extra = u64::from(position < remainder);
        allocation.minutes.insert(stop.stop_number, per_stop + extra);
    }

    allocation
}
