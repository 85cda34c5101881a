//! Crawl definitions as supplied by the crawl data source.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::CrawlId;

/// Problems with a crawl's stop numbering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Stop at position {position} has non-positive stop number")]
    NonPositiveStopNumber { position: usize },

    #[error("Duplicate stop number {0}")]
    DuplicateStopNumber(u32),

    #[error("Stop {stop_number} is at position {position}, expected stop number {expected}")]
    OutOfPosition {
        stop_number: u32,
        position: usize,
        expected: u32,
    },
}

/// What the user does at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    /// Free-text answer checked by the answer validator
    #[default]
    Riddle,
    /// Location check-in
    Location,
    /// Photo task
    Photo,
    /// Timed/button reveal
    Reveal,
}

impl std::fmt::Display for StopKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopKind::Riddle => write!(f, "riddle"),
            StopKind::Location => write!(f, "location"),
            StopKind::Photo => write!(f, "photo"),
            StopKind::Reveal => write!(f, "reveal"),
        }
    }
}

/// One stop in a crawl's ordered stop list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopDefinition {
    /// 1-based, equal to position + 1
    pub stop_number: u32,

    #[serde(default)]
    pub kind: StopKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Canonical answer for riddle stops
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    /// Minutes after the previous stop's reveal before this one unlocks.
    /// Present on any stop => the crawl is reveal-gated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal_after_minutes: Option<f64>,
}

impl StopDefinition {
    pub fn new(stop_number: u32) -> Self {
        Self {
            stop_number,
            kind: StopKind::default(),
            title: None,
            answer: None,
            reveal_after_minutes: None,
        }
    }

    pub fn with_kind(mut self, kind: StopKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    pub fn with_reveal_after(mut self, minutes: f64) -> Self {
        self.reveal_after_minutes = Some(minutes);
        self
    }
}

/// Returns true if any stop carries a reveal offset, which switches the
/// whole crawl into reveal-gated ("public/scheduled") mode.
pub fn is_public_mode(stops: &[StopDefinition]) -> bool {
    stops.iter().any(|s| s.reveal_after_minutes.is_some())
}

/// The schedule-relevant part of a crawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlScheduleInput {
    /// `HH:MM[:SS]` or `YYYY-MM-DD HH:MM[:SS]`; None for unscheduled crawls
    #[serde(default)]
    pub start_time: Option<String>,

    /// Advertised duration label, e.g. "2 hours"
    #[serde(default)]
    pub duration: String,

    #[serde(default)]
    pub stops: Vec<StopDefinition>,
}

impl CrawlScheduleInput {
    pub fn new(start_time: Option<String>, duration: impl Into<String>) -> Self {
        Self {
            start_time,
            duration: duration.into(),
            stops: Vec::new(),
        }
    }

    pub fn with_stops(mut self, stops: Vec<StopDefinition>) -> Self {
        self.stops = stops;
        self
    }

    /// Look up a stop by its number.
    pub fn stop(&self, stop_number: u32) -> Option<&StopDefinition> {
        self.stops.iter().find(|s| s.stop_number == stop_number)
    }

    /// Position of a stop in the list.
    pub fn stop_index(&self, stop_number: u32) -> Option<usize> {
        self.stops.iter().position(|s| s.stop_number == stop_number)
    }

    pub fn is_public_mode(&self) -> bool {
        is_public_mode(&self.stops)
    }

    /// Check that stop numbers are positive, unique and match their position.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let mut seen = HashSet::new();
        for (position, stop) in self.stops.iter().enumerate() {
            if stop.stop_number == 0 {
                return Err(ScheduleError::NonPositiveStopNumber { position });
            }
            if !seen.insert(stop.stop_number) {
                return Err(ScheduleError::DuplicateStopNumber(stop.stop_number));
            }
            let expected = position as u32 + 1;
            if stop.stop_number != expected {
                return Err(ScheduleError::OutOfPosition {
                    stop_number: stop.stop_number,
                    position,
                    expected,
                });
            }
        }
        Ok(())
    }
}

/// A stored crawl: identity, display fields and its schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlRecord {
    pub id: CrawlId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(flatten)]
    pub schedule: CrawlScheduleInput,
}

impl CrawlRecord {
    pub fn new(id: impl Into<CrawlId>, name: impl Into<String>, schedule: CrawlScheduleInput) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            city: None,
            schedule,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }
}
