//! Daily timeline events.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default block color, matching the app accent.
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// Anything with an id, a start and a duration can be laid out.
pub trait TimeBoxed {
    fn id(&self) -> &str;
    fn start_time(&self) -> DateTime<Utc>;
    /// Duration in seconds
    fn duration_secs(&self) -> i64;

    fn end_time(&self) -> DateTime<Utc> {
        end_after(self.start_time(), self.duration_secs())
    }
}

/// `start + secs`, saturating at the ends of the representable range.
pub(crate) fn end_after(start: DateTime<Utc>, secs: i64) -> DateTime<Utc> {
    Duration::try_seconds(secs)
        .and_then(|d| start.checked_add_signed(d))
        .unwrap_or(if secs < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

/// A time-boxed block on a day timeline.
///
/// Events on the same day may overlap freely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyEvent {
    pub id: String,
    pub title: String,
    /// Day the event is planned for
    pub scheduled_day: NaiveDate,
    pub start_time: DateTime<Utc>,
    /// Duration in seconds; the editing grid keeps it at 900 or more
    pub duration_secs: i64,
    pub color_tag: String,
    pub notes: Option<String>,
    /// Quadrant task this block was planned from
    pub linked_task_id: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DailyEvent {
    pub fn new<Tz: TimeZone>(
        title: impl Into<String>,
        scheduled_day: NaiveDate,
        start_time: DateTime<Utc>,
        duration_secs: i64,
        now: &DateTime<Tz>,
    ) -> Self {
        DailyEvent {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            scheduled_day,
            start_time,
            duration_secs,
            color_tag: DEFAULT_COLOR.to_string(),
            notes: None,
            linked_task_id: None,
            is_completed: false,
            completed_at: None,
            created_at: now.with_timezone(&Utc),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color_tag = color.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn linked_to(mut self, task_id: impl Into<String>) -> Self {
        self.linked_task_id = Some(task_id.into());
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::try_seconds(self.duration_secs).unwrap_or(if self.duration_secs < 0 {
            Duration::MIN
        } else {
            Duration::MAX
        })
    }

    /// Derived, never stored.
    pub fn end_time(&self) -> DateTime<Utc> {
        end_after(self.start_time, self.duration_secs)
    }

    /// Whether `at` falls inside `[start, end)`.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start_time <= at && at < self.end_time()
    }
}

impl TimeBoxed for DailyEvent {
    fn id(&self) -> &str {
        &self.id
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn duration_secs(&self) -> i64 {
        self.duration_secs
    }
}

/// Minimal layout input for callers that do not hold full events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBox {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub duration_secs: i64,
}

impl TimeBox {
    pub fn new(id: impl Into<String>, start_time: DateTime<Utc>, duration_secs: i64) -> Self {
        Self {
            id: id.into(),
            start_time,
            duration_secs,
        }
    }
}

impl TimeBoxed for TimeBox {
    fn id(&self) -> &str {
        &self.id
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn duration_secs(&self) -> i64 {
        self.duration_secs
    }
}

pub fn toggle_event_completion<Tz: TimeZone>(event: &DailyEvent, now: &DateTime<Tz>) -> DailyEvent {
    let mut next = event.clone();
    next.is_completed = !event.is_completed;
    next.completed_at = next.is_completed.then(|| now.with_timezone(&Utc));
    debug!(event_id = %event.id, completed = next.is_completed, "toggled event completion");
    next
}
