//! One evaluation tick for a crawl: status, stop windows and reveal state.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::allocate::allocate;
use super::parse::parse_time_string;
use super::reveal::reveal_state;
use super::status::{crawl_end, status_from_start};
use super::stop::get_stop_timing;
use crate::models::{
    CrawlId, CrawlRecord, CrawlStatus, RevealState, StopKind, StopTiming, TimePoint,
};

/// A stop as seen by a player at one instant. Canonical answers are never included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopSnapshot {
    pub stop_number: u32,
    pub kind: StopKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// None when the crawl has no usable start time
    pub timing: Option<StopTiming>,
    pub reveal: RevealState,
}

/// Everything a crawl screen renders on a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlSnapshot {
    pub crawl_id: CrawlId,
    pub name: String,
    pub status: CrawlStatus,
    pub start_time: Option<TimePoint>,
    pub end_time: Option<TimePoint>,
    pub public_mode: bool,
    pub stops: Vec<StopSnapshot>,
}

impl CrawlSnapshot {
    /// Evaluate a crawl at `now`. Pure: the same record and instant always
    /// produce the same snapshot.
    pub fn evaluate<Tz: TimeZone>(record: &CrawlRecord, now: &DateTime<Tz>) -> Self {
        let schedule = &record.schedule;
        let now_point = TimePoint::from_datetime(now);
        let public_mode = schedule.is_public_mode();

        let start = match schedule.start_time.as_deref() {
            Some(text) => match parse_time_string(text, now) {
                Ok(start) => Some(start),
                Err(e) => {
                    debug!(crawl = %record.id, error = %e, "Crawl start time unusable");
                    None
                }
            },
            None => None,
        };

        let Some(start) = start else {
            let stops = schedule
                .stops
                .iter()
                .map(|stop| StopSnapshot {
                    stop_number: stop.stop_number,
                    kind: stop.kind,
                    title: stop.title.clone(),
                    timing: None,
                    reveal: if public_mode {
                        RevealState {
                            available: false,
                            ..RevealState::ungated(stop.stop_number)
                        }
                    } else {
                        RevealState::ungated(stop.stop_number)
                    },
                })
                .collect();

            return Self {
                crawl_id: record.id.clone(),
                name: record.name.clone(),
                status: CrawlStatus::Unknown,
                start_time: None,
                end_time: None,
                public_mode,
                stops,
            };
        };

        let status = status_from_start(start, &schedule.duration, &schedule.stops, now_point);
        let allocation = allocate(&schedule.duration, &schedule.stops);

        // Completed crawls mark every stop completed; upcoming ones none.
        let current_index = match &status {
            CrawlStatus::Ongoing {
                current_stop_index, ..
            } => current_stop_index.unwrap_or(0),
            CrawlStatus::Completed => schedule.stops.len(),
            CrawlStatus::Upcoming { .. } | CrawlStatus::Unknown => 0,
        };

        let stops = schedule
            .stops
            .iter()
            .enumerate()
            .map(|(index, stop)| StopSnapshot {
                stop_number: stop.stop_number,
                kind: stop.kind,
                title: stop.title.clone(),
                timing: Some(get_stop_timing(
                    stop.stop_number,
                    start,
                    &allocation,
                    current_index,
                    now_point,
                )),
                reveal: reveal_state(start, index, &schedule.stops, now_point),
            })
            .collect();

        Self {
            crawl_id: record.id.clone(),
            name: record.name.clone(),
            status,
            start_time: Some(start),
            end_time: Some(crawl_end(start, &schedule.duration)),
            public_mode,
            stops,
        }
    }

    pub fn stop(&self, stop_number: u32) -> Option<&StopSnapshot> {
        self.stops.iter().find(|s| s.stop_number == stop_number)
    }

    /// The stop currently in progress, if any.
    pub fn active_stop(&self) -> Option<&StopSnapshot> {
        self.stops
            .iter()
            .find(|s| s.timing.as_ref().is_some_and(|t| t.is_active))
    }

    /// The next gated stop and its countdown.
    pub fn next_reveal(&self) -> Option<&StopSnapshot> {
        self.stops.iter().find(|s| !s.reveal.available)
    }
}
