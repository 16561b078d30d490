//! Quadrant classification and reclassification.
//!
//! All functions take `now` explicitly. Calendar-day arithmetic happens in the
//! time zone `now` carries, so passing `Local::now()` classifies against the
//! user's calendar and passing a `DateTime<Utc>` gives a fully deterministic
//! result for tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::{debug, warn};

use super::category::{Category, QuadrantView};
use super::ordering::compare_intelligence;
use super::{Importance, Task};

/// Whole calendar days from `now`'s day to `target`'s day.
///
/// Both sides are normalized to the start of their day in `now`'s zone, so a
/// deadline later today is 0 days away and one yesterday is -1.
pub fn days_remaining<Tz: TimeZone>(now: &DateTime<Tz>, target: &DateTime<Utc>) -> i64 {
    let today = now.date_naive();
    let target_day = target.with_timezone(&now.timezone()).date_naive();
    target_day.signed_duration_since(today).num_days()
}

/// Urgency is computed from the deadline while a threshold is active,
/// otherwise it is the manual flag.
pub fn is_urgent<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> bool {
    match (task.target_date, task.urgent_threshold_days) {
        (Some(target), Some(threshold)) => days_remaining(now, &target) <= i64::from(threshold),
        _ => task.manual_urgent,
    }
}

/// A task is overdue one full day after its nominal deadline.
pub fn is_overdue<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> bool {
    if task.is_completed {
        return false;
    }
    let Some(target) = task.target_date else {
        return false;
    };
    match target.checked_add_signed(Duration::days(1)) {
        Some(deadline) => deadline < now.with_timezone(&Utc),
        None => {
            warn!(task_id = %task.id, "target date out of range, treating as not overdue");
            false
        }
    }
}

pub fn quadrant<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> Category {
    if task.is_completed {
        return Category::Completed;
    }
    Category::from_facets(task.importance.is_important(), is_urgent(task, now))
}

/// Reclassify a task into `target`, as when it is dropped on a quadrant.
///
/// The urgency and importance facets are resolved independently and a facet
/// that already matches the target is left untouched, shadows included.
/// `Completed` constrains neither facet and returns the task unchanged.
pub fn apply_quadrant<Tz: TimeZone>(task: &Task, target: Category, now: &DateTime<Tz>) -> Task {
    let (Some(wants_important), Some(wants_urgent)) = (target.is_important(), target.is_urgent())
    else {
        return task.clone();
    };

    let mut next = task.clone();
    let was_urgent = is_urgent(task, now);
    let was_important = task.importance.is_important();

    if wants_urgent && !was_urgent {
        if let Some(target_date) = task.target_date {
            let remaining = days_remaining(now, &target_date);
            let threshold = task
                .memory
                .restorable_threshold(remaining)
                .unwrap_or_else(|| clamp_threshold(remaining));
            next.urgent_threshold_days = Some(threshold);
        }
        next.manual_urgent = true;
    } else if !wants_urgent && was_urgent {
        // The remembered threshold stays for the next promotion.
        next.urgent_threshold_days = None;
        next.manual_urgent = false;
    }

    if wants_important && !was_important {
        next.importance = Importance::High;
    } else if !wants_important && was_important {
        next.importance = task.memory.demoted_importance();
    }

    if wants_urgent != was_urgent || wants_important != was_important {
        next.last_modified_at = now.with_timezone(&Utc);
        debug!(
            task_id = %task.id,
            from = %quadrant(task, now),
            to = %target,
            threshold = ?next.urgent_threshold_days,
            importance = %next.importance,
            "moved task to quadrant"
        );
    }
    next
}

fn clamp_threshold(remaining: i64) -> u32 {
    u32::try_from(remaining.max(0)).unwrap_or(u32::MAX)
}

/// Tasks shown in a quadrant view, in intelligence order.
///
/// Completed tasks linger in their facet quadrant (and in `All`) for
/// `visibility` after completion so a checked-off row does not vanish
/// immediately. The `Completed` view lists every completed task.
pub fn filter_tasks<Tz: TimeZone>(
    tasks: &[Task],
    view: QuadrantView,
    now: &DateTime<Tz>,
    visibility: Duration,
) -> Vec<Task> {
    let now_utc = now.with_timezone(&Utc);
    let is_visible = |task: &Task| {
        !task.is_completed
            || now_utc.signed_duration_since(task.completed_at.unwrap_or(now_utc)) <= visibility
    };

    let mut filtered: Vec<Task> = tasks
        .iter()
        .filter(|task| match view {
            QuadrantView::All => is_visible(task),
            QuadrantView::Only(Category::Completed) => task.is_completed,
            QuadrantView::Only(category) => {
                is_visible(task)
                    && category.is_important() == Some(task.importance.is_important())
                    && category.is_urgent() == Some(is_urgent(task, now))
            }
        })
        .cloned()
        .collect();
    filtered.sort_by(compare_intelligence);
    filtered
}
