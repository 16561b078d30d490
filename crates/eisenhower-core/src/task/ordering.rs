//! Task ordering.
//!
//! The "intelligence" order sorts by, in turn:
//! 1. pinned before unpinned
//! 2. dated before undated, soonest date first
//! 3. importance, `high > normal > low`
//! 4. older `last_modified_at` first
//!
//! Every comparator falls back to the task id, so the output never depends on
//! the order a store happened to return rows in.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::Task;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMethod {
    #[default]
    Intelligence,
    TargetDate,
    CreationDate,
    Title,
}

impl SortMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMethod::Intelligence => "intelligence",
            SortMethod::TargetDate => "target_date",
            SortMethod::CreationDate => "creation_date",
            SortMethod::Title => "title",
        }
    }

    pub fn comparator(self) -> fn(&Task, &Task) -> Ordering {
        match self {
            SortMethod::Intelligence => compare_intelligence,
            SortMethod::TargetDate => compare_target_date,
            SortMethod::CreationDate => compare_creation_date,
            SortMethod::Title => compare_title,
        }
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intelligence" => Ok(SortMethod::Intelligence),
            "target_date" => Ok(SortMethod::TargetDate),
            "creation_date" => Ok(SortMethod::CreationDate),
            "title" => Ok(SortMethod::Title),
            other => Err(ValidationError::InvalidValue {
                field: "sort".into(),
                message: format!("unknown sort method '{other}'"),
            }),
        }
    }
}

/// Dated tasks first, soonest first.
fn compare_dates(a: &Task, b: &Task) -> Ordering {
    match (a.target_date, b.target_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare_intelligence(a: &Task, b: &Task) -> Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| compare_dates(a, b))
        .then_with(|| b.importance.rank().cmp(&a.importance.rank()))
        .then_with(|| a.last_modified_at.cmp(&b.last_modified_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn compare_target_date(a: &Task, b: &Task) -> Ordering {
    compare_dates(a, b).then_with(|| a.id.cmp(&b.id))
}

pub fn compare_creation_date(a: &Task, b: &Task) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

pub fn compare_title(a: &Task, b: &Task) -> Ordering {
    a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id))
}

/// Return a sorted copy of `tasks`.
pub fn sort_tasks(tasks: &[Task], method: SortMethod) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(method.comparator());
    sorted
}

pub fn sort_intelligence(tasks: &[Task]) -> Vec<Task> {
    sort_tasks(tasks, SortMethod::Intelligence)
}

pub fn sort_by_target_date(tasks: &[Task]) -> Vec<Task> {
    sort_tasks(tasks, SortMethod::TargetDate)
}

pub fn sort_by_creation_date(tasks: &[Task]) -> Vec<Task> {
    sort_tasks(tasks, SortMethod::CreationDate)
}

pub fn sort_by_title(tasks: &[Task]) -> Vec<Task> {
    sort_tasks(tasks, SortMethod::Title)
}
