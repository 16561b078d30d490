//! Task entity and its value-level transitions.
//!
//! A [`Task`] is a plain value. Every mutation (completion toggle, form edit,
//! pinning, quadrant drag) is a function that takes the current value and
//! returns the next one; the caller owns storage and swaps the old value out.
//!
//! Urgency has two sources:
//!
//! - a manual flag (`manual_urgent`), used when no threshold is active
//! - a day threshold (`urgent_threshold_days`) that, together with a
//!   `target_date`, makes urgency a computed property of the calendar
//!
//! The [`TaskMemory`] snapshot remembers the last meaningful importance and
//! threshold so that dragging a task between quadrants and back restores the
//! user's configuration instead of collapsing to defaults.

pub mod category;
pub mod classify;
pub mod ordering;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::ValidationError;

pub use category::{Category, QuadrantView};
pub use ordering::SortMethod;

/// Importance level picked in the task form.
///
/// Only `High` places a task in an "important" quadrant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Normal,
    High,
}

impl Importance {
    /// Fixed rank used by the intelligence ordering (`high > normal > low`).
    pub fn rank(self) -> u8 {
        match self {
            Importance::Low => 0,
            Importance::Normal => 1,
            Importance::High => 2,
        }
    }

    pub fn is_important(self) -> bool {
        self == Importance::High
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Normal => "normal",
            Importance::High => "high",
        }
    }
}

impl Default for Importance {
    fn default() -> Self {
        Importance::Normal
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Importance::Low),
            "normal" => Ok(Importance::Normal),
            "high" => Ok(Importance::High),
            other => Err(ValidationError::InvalidValue {
                field: "importance".into(),
                message: format!("expected low, normal or high, got '{other}'"),
            }),
        }
    }
}

/// Last known good configuration of a task's facets.
///
/// Neither field is cleared by a demotion. The threshold survives any number
/// of urgent/not-urgent round trips and the importance is only replaced by an
/// explicit edit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskMemory {
    /// Importance level captured before a promotion to `High`.
    pub importance: Option<Importance>,
    /// Last threshold the user configured.
    pub urgent_threshold_days: Option<u32>,
}

impl TaskMemory {
    /// Importance to fall back to when a task leaves the important row.
    ///
    /// A remembered `High` cannot be restored (the task would stay important),
    /// so it degrades to `Normal`, as does an empty memory.
    pub fn demoted_importance(&self) -> Importance {
        match self.importance {
            Some(Importance::High) | None => Importance::Normal,
            Some(level) => level,
        }
    }

    /// The remembered threshold, if it still makes the task urgent given
    /// `remaining` calendar days until the deadline.
    pub fn restorable_threshold(&self, remaining: i64) -> Option<u32> {
        self.urgent_threshold_days
            .filter(|&threshold| remaining <= i64::from(threshold))
    }
}

/// A quadrant/backlog item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Display title (non-empty is enforced by the input layer)
    pub title: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Updated on every mutation
    pub last_modified_at: DateTime<Utc>,
    /// Optional deadline
    pub target_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
    /// Set when completion is toggled on, cleared when toggled off
    pub completed_at: Option<DateTime<Utc>>,
    pub importance: Importance,
    /// User-set urgency, consulted only while no threshold is active
    pub manual_urgent: bool,
    /// Active auto-urgency threshold; meaningful only with a `target_date`
    pub urgent_threshold_days: Option<u32>,
    /// Shadow configuration used to restore intent after a quadrant round trip
    #[serde(default)]
    pub memory: TaskMemory,
    /// Pinned tasks sort first
    pub is_pinned: bool,
}

impl Task {
    /// Create a new task with form defaults.
    pub fn new<Tz: TimeZone>(title: impl Into<String>, now: &DateTime<Tz>) -> Self {
        let now = now.with_timezone(&Utc);
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            created_at: now,
            last_modified_at: now,
            target_date: None,
            is_completed: false,
            completed_at: None,
            importance: Importance::Normal,
            manual_urgent: false,
            urgent_threshold_days: None,
            memory: TaskMemory::default(),
            is_pinned: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_manual_urgent(mut self, urgent: bool) -> Self {
        self.manual_urgent = urgent;
        self
    }

    pub fn with_target_date(mut self, target_date: DateTime<Utc>) -> Self {
        self.target_date = Some(target_date);
        self
    }

    pub fn with_threshold(mut self, days: u32) -> Self {
        self.urgent_threshold_days = Some(days);
        self
    }

    pub fn with_memory(mut self, memory: TaskMemory) -> Self {
        self.memory = memory;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.is_pinned = true;
        self
    }

    /// Whether urgency is currently derived from the deadline.
    pub fn has_active_threshold(&self) -> bool {
        self.target_date.is_some() && self.urgent_threshold_days.is_some()
    }
}

/// Field set submitted by the task form.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEdit {
    pub title: String,
    pub importance: Importance,
    pub manual_urgent: bool,
    pub pinned: bool,
    pub target_date: Option<DateTime<Utc>>,
    /// Ignored when `target_date` is `None`
    pub urgent_threshold_days: Option<u32>,
    /// Explicit replacement for the shadow memory
    pub memory: Option<TaskMemory>,
}

impl TaskEdit {
    /// Prefill an edit with the task's current values.
    pub fn from_task(task: &Task) -> Self {
        TaskEdit {
            title: task.title.clone(),
            importance: task.importance,
            manual_urgent: task.manual_urgent,
            pinned: task.is_pinned,
            target_date: task.target_date,
            urgent_threshold_days: task.urgent_threshold_days,
            memory: None,
        }
    }
}

/// Flip completion, stamping or clearing `completed_at`.
pub fn toggle_completion<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> Task {
    let now = now.with_timezone(&Utc);
    let mut next = task.clone();
    next.is_completed = !task.is_completed;
    next.completed_at = next.is_completed.then_some(now);
    next.last_modified_at = now;
    debug!(task_id = %task.id, completed = next.is_completed, "toggled task completion");
    next
}

/// Apply a form edit.
///
/// A threshold without a target date is dropped. Unless the edit carries an
/// explicit memory, a configured threshold becomes the remembered one and the
/// remembered importance is left as it was.
pub fn edit_fields<Tz: TimeZone>(task: &Task, edit: TaskEdit, now: &DateTime<Tz>) -> Task {
    let threshold = edit.target_date.and(edit.urgent_threshold_days);
    let memory = edit.memory.unwrap_or_else(|| {
        let mut memory = task.memory;
        if threshold.is_some() {
            memory.urgent_threshold_days = threshold;
        }
        memory
    });

    let next = Task {
        title: edit.title,
        importance: edit.importance,
        manual_urgent: edit.manual_urgent,
        is_pinned: edit.pinned,
        target_date: edit.target_date,
        urgent_threshold_days: threshold,
        memory,
        last_modified_at: now.with_timezone(&Utc),
        ..task.clone()
    };
    debug!(task_id = %task.id, "edited task fields");
    next
}

pub fn set_pinned<Tz: TimeZone>(task: &Task, pinned: bool, now: &DateTime<Tz>) -> Task {
    let mut next = task.clone();
    if task.is_pinned != pinned {
        next.is_pinned = pinned;
        next.last_modified_at = now.with_timezone(&Utc);
    }
    next
}
