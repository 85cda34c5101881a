//! # Crawl Engine
//!
//! Timing and progress engine for self-guided city crawls.
//!
//! ## Architecture
//!
//! - **models**: Crawl, stop, status and progress data structures
//! - **timing**: Time parsing, duration allocation, lifecycle status, stop
//!   windows, reveal gating and countdown formatting
//! - **answer**: Free-text answer validation with synonym lookup
//! - **storage**: JSONL crawl source and progress store
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod answer;
pub mod api;
pub mod config;
pub mod models;
pub mod storage;
pub mod timing;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly interval string (e.g., "1s", "500ms", "5m", "2h").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(n) = s.strip_suffix("ms") {
        return n.trim().parse().ok().map(Duration::from_millis);
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.trim().parse().ok()?;
    num.checked_mul(multiplier).map(Duration::from_secs)
}
