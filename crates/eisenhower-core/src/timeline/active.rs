//! "Currently active event" query for the notification collaborator.
//!
//! The core never pushes notifications. Callers poll [`select_active`] (or an
//! [`ActivityTracker`]) and decide what to show.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::event::DailyEvent;

/// The primary active event and how many others run alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEvent {
    pub event: DailyEvent,
    pub overlap_count: usize,
}

impl ActiveEvent {
    /// Title with a "+N" suffix when other events are also running.
    pub fn display_label(&self) -> String {
        if self.overlap_count > 0 {
            format!("{} +{}", self.event.title, self.overlap_count)
        } else {
            self.event.title.clone()
        }
    }
}

/// Pick the active event at `now`.
///
/// Candidates are incomplete events scheduled on `now`'s calendar day with
/// `start <= now < end`. The earliest-ending one wins (then earliest start,
/// then id).
pub fn select_active<Tz: TimeZone>(
    events: &[DailyEvent],
    now: &DateTime<Tz>,
) -> Option<ActiveEvent> {
    let today = now.date_naive();
    let at = now.with_timezone(&Utc);

    let active: Vec<&DailyEvent> = events
        .iter()
        .filter(|e| e.scheduled_day == today && !e.is_completed && e.is_active_at(at))
        .collect();

    let primary = active.iter().min_by(|a, b| {
        a.end_time()
            .cmp(&b.end_time())
            .then_with(|| a.start_time.cmp(&b.start_time))
            .then_with(|| a.id.cmp(&b.id))
    })?;

    Some(ActiveEvent {
        event: (*primary).clone(),
        overlap_count: active.len() - 1,
    })
}

/// Read-only projection handed to a live-activity display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub event_id: String,
    pub label: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub color_tag: String,
    /// After this the display should be considered out of date
    pub stale_at: DateTime<Utc>,
}

impl ActivitySnapshot {
    pub fn from_active(active: &ActiveEvent, stale_after: Duration) -> Self {
        let end_time = active.event.end_time();
        Self {
            event_id: active.event.id.clone(),
            label: active.display_label(),
            start_time: active.event.start_time,
            end_time,
            color_tag: active.event.color_tag.clone(),
            stale_at: end_time.checked_add_signed(stale_after).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

/// What the display should do after a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityUpdate {
    /// Nothing was shown; show this
    Start(ActivitySnapshot),
    /// Something changed; replace the shown snapshot
    Update(ActivitySnapshot),
    /// Shown snapshot is still current
    Unchanged,
    /// Tear down the shown snapshot
    End,
    /// Nothing shown, nothing to show
    Idle,
}

/// Remembers the last shown snapshot so refreshes only report real changes.
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    enabled: bool,
    stale_after: Duration,
    current: Option<ActivitySnapshot>,
}

impl ActivityTracker {
    pub fn new(enabled: bool, stale_after: Duration) -> Self {
        Self {
            enabled,
            stale_after,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&ActivitySnapshot> {
        self.current.as_ref()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn refresh<Tz: TimeZone>(
        &mut self,
        events: &[DailyEvent],
        now: &DateTime<Tz>,
    ) -> ActivityUpdate {
        let next = if self.enabled {
            select_active(events, now)
                .map(|active| ActivitySnapshot::from_active(&active, self.stale_after))
        } else {
            None
        };

        let update = match (self.current.take(), next) {
            (None, None) => ActivityUpdate::Idle,
            (Some(_), None) => ActivityUpdate::End,
            (None, Some(snapshot)) => {
                self.current = Some(snapshot.clone());
                ActivityUpdate::Start(snapshot)
            }
            (Some(previous), Some(snapshot)) => {
                let changed = previous != snapshot;
                self.current = Some(snapshot.clone());
                if changed {
                    ActivityUpdate::Update(snapshot)
                } else {
                    ActivityUpdate::Unchanged
                }
            }
        };
        debug!(?update, "refreshed active event");
        update
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new(true, Duration::minutes(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::toggle_event_completion;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
    }

    fn event(id: &str, hour: u32, minute: u32, minutes: i64) -> DailyEvent {
        let start = at(hour, minute);
        DailyEvent::new(id.to_uppercase(), start.date_naive(), start, minutes * 60, &at(0, 0))
            .with_id(id)
    }

    #[test]
    fn nothing_active_outside_events() {
        let events = vec![event("a", 9, 0, 60)];
        assert!(select_active(&events, &at(8, 59)).is_none());
        assert!(select_active(&events, &at(10, 0)).is_none());
    }

    #[test]
    fn earliest_ending_event_wins() {
        let events = vec![
            event("long", 9, 0, 180),
            event("short", 9, 30, 30),
            event("mid", 9, 15, 90),
        ];
        let active = select_active(&events, &at(9, 45)).unwrap();
        assert_eq!(active.event.id, "short");
        assert_eq!(active.overlap_count, 2);
        assert_eq!(active.display_label(), "SHORT +2");
    }

    #[test]
    fn single_event_has_plain_label() {
        let events = vec![event("a", 9, 0, 60)];
        let active = select_active(&events, &at(9, 30)).unwrap();
        assert_eq!(active.overlap_count, 0);
        assert_eq!(active.display_label(), "A");
    }

    #[test]
    fn completed_and_other_day_events_are_skipped() {
        let done = toggle_event_completion(&event("done", 9, 0, 60), &at(9, 0));
        let mut yesterday = event("yesterday", 9, 0, 60);
        yesterday.scheduled_day = at(0, 0).date_naive().pred_opt().unwrap();
        assert!(select_active(&[done, yesterday], &at(9, 30)).is_none());
    }

    #[test]
    fn huge_duration_event_stays_selectable() {
        let endless = event("endless", 9, 0, 1);
        let endless = DailyEvent {
            duration_secs: i64::MAX - 7,
            ..endless
        };
        let events = vec![endless, event("a", 9, 0, 60)];

        let active = select_active(&events, &at(9, 30)).unwrap();
        assert_eq!(active.event.id, "a");
        assert_eq!(active.overlap_count, 1);

        let active = select_active(&events, &at(23, 0)).unwrap();
        assert_eq!(active.event.id, "endless");
        let snapshot = ActivitySnapshot::from_active(&active, Duration::minutes(10));
        assert_eq!(snapshot.end_time, DateTime::<Utc>::MAX_UTC);
        assert_eq!(snapshot.stale_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn tracker_reports_only_changes() {
        let mut tracker = ActivityTracker::new(true, Duration::minutes(10));
        let events = vec![event("a", 9, 0, 60)];

        assert_eq!(tracker.refresh(&events, &at(8, 0)), ActivityUpdate::Idle);

        let ActivityUpdate::Start(snapshot) = tracker.refresh(&events, &at(9, 10)) else {
            panic!("expected start");
        };
        assert_eq!(snapshot.stale_at, at(10, 10));
        assert_eq!(tracker.refresh(&events, &at(9, 20)), ActivityUpdate::Unchanged);

        let mut with_overlap = events.clone();
        with_overlap.push(event("b", 9, 15, 120));
        match tracker.refresh(&with_overlap, &at(9, 30)) {
            ActivityUpdate::Update(s) => assert_eq!(s.label, "A +1"),
            other => panic!("expected update, got {other:?}"),
        }

        assert_eq!(tracker.refresh(&events, &at(11, 0)), ActivityUpdate::End);
        assert!(tracker.current().is_none());
    }

    #[test]
    fn disabled_tracker_ends_activity() {
        let mut tracker = ActivityTracker::default();
        let events = vec![event("a", 9, 0, 60)];
        assert!(matches!(tracker.refresh(&events, &at(9, 10)), ActivityUpdate::Start(_)));
        tracker.set_enabled(false);
        assert_eq!(tracker.refresh(&events, &at(9, 20)), ActivityUpdate::End);
        assert_eq!(tracker.refresh(&events, &at(9, 30)), ActivityUpdate::Idle);
    }
}
