//! Drag and resize transitions for timeline events, snapped to a grid.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::event::DailyEvent;
use crate::error::ValidationError;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Editing grid for timeline blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapGrid {
    pub interval_minutes: u32,
    /// Shortest duration a resize may produce
    pub min_duration_secs: i64,
}

impl Default for SnapGrid {
    fn default() -> Self {
        Self {
            interval_minutes: 15,
            min_duration_secs: 900,
        }
    }
}

impl SnapGrid {
    pub fn new(interval_minutes: u32, min_duration_secs: i64) -> Self {
        Self {
            interval_minutes: interval_minutes.max(1),
            min_duration_secs,
        }
    }

    fn interval_secs(&self) -> i64 {
        i64::from(self.interval_minutes.max(1)) * 60
    }

    /// Round a timestamp to the nearest grid line of its wall-clock day in `tz`.
    ///
    /// Seconds are dropped. A time that would round to midnight of the next
    /// day is held on the last grid line of the current day.
    pub fn snap_time<Tz: TimeZone>(&self, time: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
        let interval = i64::from(self.interval_minutes.max(1));
        let local = time.with_timezone(tz);
        let minute_of_day = i64::from(local.hour() * 60 + local.minute());
        let snapped = ((minute_of_day as f64 / interval as f64).round() as i64 * interval)
            .min(MINUTES_PER_DAY - interval);

        let midnight = local.date_naive().and_time(chrono::NaiveTime::MIN);
        let naive = midnight + Duration::minutes(snapped);
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(time)
    }

    /// Round a duration to the grid, never below one interval.
    pub fn snap_duration(&self, duration_secs: i64) -> i64 {
        let interval = self.interval_secs();
        let snapped = (duration_secs as f64 / interval as f64).round() as i64 * interval;
        snapped.max(interval)
    }

    /// Move an event to a new start, keeping its duration.
    pub fn move_event<Tz: TimeZone>(
        &self,
        event: &DailyEvent,
        raw_start: DateTime<Utc>,
        tz: &Tz,
    ) -> DailyEvent {
        let mut next = event.clone();
        next.start_time = self.snap_time(raw_start, tz);
        debug!(event_id = %event.id, start = %next.start_time, "moved event");
        next
    }

    /// Drag the bottom edge: new snapped duration, same start.
    pub fn resize_end(&self, event: &DailyEvent, raw_duration_secs: i64) -> DailyEvent {
        let mut next = event.clone();
        next.duration_secs = self.snap_duration(raw_duration_secs).max(self.min_duration_secs);
        debug!(event_id = %event.id, duration_secs = next.duration_secs, "resized event end");
        next
    }

    /// Drag the top edge: the end stays fixed while the start moves.
    ///
    /// Rejected when the remaining duration would drop under the minimum.
    pub fn resize_start<Tz: TimeZone>(
        &self,
        event: &DailyEvent,
        raw_start: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<DailyEvent, ValidationError> {
        let end = event.end_time();
        let start = self.snap_time(raw_start, tz);
        let duration_secs = end.signed_duration_since(start).num_seconds();
        if duration_secs < self.min_duration_secs {
            return Err(ValidationError::DurationTooShort {
                secs: duration_secs,
                min_secs: self.min_duration_secs,
            });
        }

        let mut next = event.clone();
        next.start_time = start;
        next.duration_secs = duration_secs;
        debug!(event_id = %event.id, start = %start, duration_secs, "resized event start");
        Ok(next)
    }
}
