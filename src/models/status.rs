//! Derived lifecycle, per-stop timing and reveal state.
//!
//! All of these are recomputed from scratch on every evaluation tick.

use serde::{Deserialize, Serialize};

use super::TimePoint;

/// Lifecycle of a scheduled crawl relative to the current instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CrawlStatus {
    /// now < start
    Upcoming { countdown: String },
    /// start <= now <= end
    Ongoing {
        elapsed: String,
        /// 0-based; None when the crawl has no stops
        current_stop_index: Option<usize>,
    },
    /// now > end
    Completed,
    /// No usable start time
    Unknown,
}

impl CrawlStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CrawlStatus::Upcoming { .. } => "upcoming",
            CrawlStatus::Ongoing { .. } => "ongoing",
            CrawlStatus::Completed => "completed",
            CrawlStatus::Unknown => "unknown",
        }
    }

    /// The countdown or elapsed label, if the status carries one.
    pub fn display_time(&self) -> Option<&str> {
        match self {
            CrawlStatus::Upcoming { countdown } => Some(countdown),
            CrawlStatus::Ongoing { elapsed, .. } => Some(elapsed),
            CrawlStatus::Completed | CrawlStatus::Unknown => None,
        }
    }

    pub fn current_stop_index(&self) -> Option<usize> {
        match self {
            CrawlStatus::Ongoing {
                current_stop_index, ..
            } => *current_stop_index,
            _ => None,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        matches!(self, CrawlStatus::Ongoing { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CrawlStatus::Completed)
    }
}

impl std::fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.display_time() {
            Some(time) => write!(f, "{} ({})", self.label(), time),
            None => write!(f, "{}", self.label()),
        }
    }
}

/// A single stop's time window within a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTiming {
    pub stop_number: u32,
    pub start_time: TimePoint,
    pub end_time: TimePoint,
    pub duration_minutes: u64,
    pub is_active: bool,
    pub is_completed: bool,
}

/// Availability of a stop under reveal gating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    pub stop_number: u32,

    /// None when the crawl is not reveal-gated
    pub reveal_time: Option<TimePoint>,

    pub available: bool,

    /// Whole seconds until the stop unlocks, rounded up; 0 once available
    pub seconds_remaining: u64,

    /// Formatted `seconds_remaining` while gated
    pub countdown: Option<String>,
}

impl RevealState {
    /// State for a stop that is not time-gated.
    pub fn ungated(stop_number: u32) -> Self {
        Self {
            stop_number,
            reveal_time: None,
            available: true,
            seconds_remaining: 0,
            countdown: None,
        }
    }
}
