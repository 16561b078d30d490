//! Property tests for the layout, classification and ordering engines.

use chrono::{DateTime, Duration, TimeZone, Utc};
use eisenhower_core::{
    is_overdue, is_urgent, sort_tasks, DailyEvent, Importance, SortMethod, Task, TimelineLayout,
};
use proptest::prelude::*;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()
}

fn events_strategy() -> impl Strategy<Value = Vec<DailyEvent>> {
    prop::collection::vec((0i64..(24 * 60 - 15), 15i64..240), 0..24).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (start_min, len_min))| {
                let start = base() + Duration::minutes(start_min);
                DailyEvent::new(format!("e{i}"), start.date_naive(), start, len_min * 60, &base())
                    .with_id(format!("e{i:02}"))
            })
            .collect()
    })
}

fn tasks_strategy() -> impl Strategy<Value = Vec<Task>> {
    let importance = prop_oneof![
        Just(Importance::Low),
        Just(Importance::Normal),
        Just(Importance::High)
    ];
    prop::collection::vec(
        (any::<bool>(), prop::option::of(-5i64..30), importance, 0i64..600, "[a-c]{1,2}"),
        0..16,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (pinned, due, importance, modified, title))| {
                let mut task = Task::new(title, &(base() + Duration::minutes(modified)))
                    .with_id(format!("t{i:02}"))
                    .with_importance(importance);
                if let Some(days) = due {
                    task = task.with_target_date(base() + Duration::days(days));
                }
                if pinned {
                    task = task.pinned();
                }
                task
            })
            .collect()
    })
}

fn overlaps(a: &DailyEvent, b: &DailyEvent) -> bool {
    a.start_time < b.end_time() && b.start_time < a.end_time()
}

proptest! {
    #[test]
    fn layout_covers_every_event_within_bounds(events in events_strategy()) {
        let geometry = TimelineLayout::default().layout(&events, &Utc);
        prop_assert_eq!(geometry.len(), events.len());
        for g in geometry.values() {
            prop_assert!(g.column_index < g.column_count);
            prop_assert!((g.column_width * g.column_count as f64 - 1.0).abs() < 1e-9);
            prop_assert!(g.column_x + g.column_width <= 1.0 + 1e-9);
            prop_assert!(g.height > 0.0);
        }
    }

    #[test]
    fn overlapping_events_never_share_a_column(events in events_strategy()) {
        let geometry = TimelineLayout::default().layout(&events, &Utc);
        for a in &events {
            for b in &events {
                if a.id != b.id && overlaps(a, b) {
                    let (ga, gb) = (&geometry[&a.id], &geometry[&b.id]);
                    prop_assert_ne!(ga.column_index, gb.column_index);
                    prop_assert_eq!(ga.column_count, gb.column_count);
                }
            }
        }
    }

    #[test]
    fn layout_ignores_input_order(events in events_strategy()) {
        let mut reversed = events.clone();
        reversed.reverse();
        let layout = TimelineLayout::default();
        prop_assert_eq!(layout.layout(&events, &Utc), layout.layout(&reversed, &Utc));
    }

    #[test]
    fn undated_tasks_fall_back_to_manual_urgency(
        manual in any::<bool>(),
        threshold in prop::option::of(0u32..30),
    ) {
        let mut task = Task::new("t", &base()).with_manual_urgent(manual);
        task.urgent_threshold_days = threshold;
        prop_assert_eq!(is_urgent(&task, &base()), manual);
        prop_assert!(!is_overdue(&task, &base()));
    }

    #[test]
    fn overdue_needs_a_full_day_past_deadline(offset_hours in -72i64..72) {
        let task = Task::new("t", &base()).with_target_date(base());
        let now = base() + Duration::hours(offset_hours);
        prop_assert_eq!(is_overdue(&task, &now), offset_hours > 24);
    }

    #[test]
    fn sorting_is_deterministic(tasks in tasks_strategy()) {
        let methods = [
            SortMethod::Intelligence,
            SortMethod::TargetDate,
            SortMethod::CreationDate,
            SortMethod::Title,
        ];
        for method in methods {
            let mut reversed = tasks.clone();
            reversed.reverse();
            let ids = |list: &[Task]| -> Vec<String> {
                sort_tasks(list, method).into_iter().map(|t| t.id).collect()
            };
            let forward = ids(&tasks);
            let backward = ids(&reversed);
            prop_assert_eq!(forward, backward);
        }
    }

    #[test]
    fn pinned_tasks_always_lead(tasks in tasks_strategy()) {
        let sorted = sort_tasks(&tasks, SortMethod::Intelligence);
        let first_unpinned = sorted.iter().position(|t| !t.is_pinned).unwrap_or(sorted.len());
        prop_assert!(sorted[first_unpinned..].iter().all(|t| !t.is_pinned));
    }
}
