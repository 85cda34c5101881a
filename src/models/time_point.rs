//! Absolute instants used by the timing engine.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An absolute point in time, stored as UTC.
///
/// Time strings become `TimePoint`s through the time parser; everything else
/// in the engine derives new points by offsetting an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimePoint(DateTime<Utc>);

impl TimePoint {
    /// Capture the instant represented by a zoned datetime.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.with_timezone(&Utc))
    }

    /// The instant as a UTC datetime.
    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    /// The instant rendered in the device's local timezone.
    pub fn to_local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    /// Offset by a whole number of minutes.
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        self.plus_millis(minutes.saturating_mul(60_000))
    }

    /// Offset by milliseconds, saturating at chrono's representable range.
    pub fn plus_millis(&self, millis: i64) -> Self {
        let shifted = self
            .0
            .checked_add_signed(Duration::milliseconds(millis.max(-i64::MAX)))
            .unwrap_or(if millis >= 0 {
                DateTime::<Utc>::MAX_UTC
            } else {
                DateTime::<Utc>::MIN_UTC
            });
        Self(shifted)
    }

    /// Signed milliseconds from `self` until `later` (negative if `later` is earlier).
    pub fn millis_until(&self, later: TimePoint) -> i64 {
        later.0.signed_duration_since(self.0).num_milliseconds()
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TimePoint {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::from_datetime(&dt)
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
