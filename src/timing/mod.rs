//! Crawl timing engine.
//!
//! Pure functions over a crawl's schedule and an explicit current instant:
//! - **parse**: time strings to absolute instants
//! - **allocate**: split the advertised duration across stops
//! - **status**: upcoming / ongoing / completed / unknown
//! - **stop**: per-stop start/end windows
//! - **reveal**: reveal-gated availability for scheduled crawls
//! - **format**: countdown rendering
//! - **snapshot**: everything above combined for one tick
//!
//! Only callers at the edge (CLI, API) read the wall clock, through [`Clock`].

use thiserror::Error;

pub mod allocate;
pub mod clock;
pub mod format;
pub mod parse;
pub mod reveal;
pub mod snapshot;
pub mod status;
pub mod stop;

pub use allocate::{allocate, parse_duration_hours, DurationAllocation, DEFAULT_DURATION_HOURS};
pub use clock::{Clock, FixedClock, SystemClock};
pub use format::format_time_remaining;
pub use parse::parse_time_string;
pub use reveal::{
    cumulative_reveal_minutes, is_available, reveal_state, reveal_time, seconds_until_reveal,
};
pub use snapshot::{CrawlSnapshot, StopSnapshot};
pub use status::{calculate_crawl_status, current_stop_index, format_elapsed, status_from_start};
pub use stop::{get_stop_timing, get_stop_timings};

/// Errors from the timing engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimingError {
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),
}
