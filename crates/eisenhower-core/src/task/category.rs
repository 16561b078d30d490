//! Quadrant categories and list views.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Derived placement of a task. Never stored.
///
/// Completion dominates: a completed task is `Completed` whatever its facets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "important_urgent")]
    ImportantUrgent,
    #[serde(rename = "important_not_urgent")]
    ImportantNotUrgent,
    #[serde(rename = "urgent_not_important")]
    UrgentNotImportant,
    #[serde(rename = "not_important_not_urgent")]
    Neither,
    #[serde(rename = "completed")]
    Completed,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::ImportantUrgent,
        Category::ImportantNotUrgent,
        Category::UrgentNotImportant,
        Category::Neither,
        Category::Completed,
    ];

    /// Cross the two facets into one of the four open quadrants.
    pub fn from_facets(important: bool, urgent: bool) -> Self {
        match (important, urgent) {
            (true, true) => Category::ImportantUrgent,
            (true, false) => Category::ImportantNotUrgent,
            (false, true) => Category::UrgentNotImportant,
            (false, false) => Category::Neither,
        }
    }

    /// Importance facet demanded by this quadrant (`None` for `Completed`).
    pub fn is_important(self) -> Option<bool> {
        match self {
            Category::ImportantUrgent | Category::ImportantNotUrgent => Some(true),
            Category::UrgentNotImportant | Category::Neither => Some(false),
            Category::Completed => None,
        }
    }

    /// Urgency facet demanded by this quadrant (`None` for `Completed`).
    pub fn is_urgent(self) -> Option<bool> {
        match self {
            Category::ImportantUrgent | Category::UrgentNotImportant => Some(true),
            Category::ImportantNotUrgent | Category::Neither => Some(false),
            Category::Completed => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::ImportantUrgent => "important_urgent",
            Category::ImportantNotUrgent => "important_not_urgent",
            Category::UrgentNotImportant => "urgent_not_important",
            Category::Neither => "not_important_not_urgent",
            Category::Completed => "completed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown category '{s}'"),
            })
    }
}

/// A list view over the task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadrantView {
    All,
    Only(Category),
}

impl FromStr for QuadrantView {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(QuadrantView::All)
        } else {
            s.parse().map(QuadrantView::Only)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_roundtrip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("urgent".parse::<Category>().is_err());
    }

    #[test]
    fn serde_uses_stable_keys() {
        let json = serde_json::to_string(&Category::Neither).unwrap();
        assert_eq!(json, "\"not_important_not_urgent\"");
    }

    #[test]
    fn completed_constrains_no_facet() {
        assert_eq!(Category::Completed.is_important(), None);
        assert_eq!(Category::Completed.is_urgent(), None);
        assert_eq!(Category::UrgentNotImportant.is_urgent(), Some(true));
        assert_eq!(Category::UrgentNotImportant.is_important(), Some(false));
    }

    #[test]
    fn view_parses_all_and_categories() {
        assert_eq!("all".parse::<QuadrantView>().unwrap(), QuadrantView::All);
        assert_eq!(
            "completed".parse::<QuadrantView>().unwrap(),
            QuadrantView::Only(Category::Completed)
        );
    }
}
