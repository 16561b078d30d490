//! Integration tests: engines driving the SQLite store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use eisenhower_core::{
    apply_quadrant, edit_fields, filter_tasks, quadrant, select_active, sort_tasks,
    toggle_completion, toggle_event_completion, Category, Config, DailyEvent, EventStore,
    Importance, QuadrantView, SortMethod, Task, TaskEdit, TaskStore, TimelineLayout, TriageDb,
};

fn monday_9am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

#[test]
fn test_quadrant_round_trip_through_storage() {
    let mut db = TriageDb::open_memory().unwrap();
    let now = monday_9am();

    // A task due in 5 days with a 7-day threshold is urgent.
    let task = Task::new("Tax return", &now)
        .with_id("tax")
        .with_target_date(now + Duration::days(5));
    let task = edit_fields(
        &task,
        TaskEdit {
            urgent_threshold_days: Some(7),
            importance: Importance::High,
            ..TaskEdit::from_task(&task)
        },
        &now,
    );
    db.save(&task).unwrap();
    assert_eq!(quadrant(&task, &now), Category::ImportantUrgent);

    // Demote, persist, reload.
    let later = now + Duration::minutes(5);
    let stored = db.get("tax").unwrap().unwrap();
    let demoted = apply_quadrant(&stored, Category::ImportantNotUrgent, &later);
    db.save(&demoted).unwrap();
    let reloaded = db.get("tax").unwrap().unwrap();
    assert_eq!(quadrant(&reloaded, &later), Category::ImportantNotUrgent);
    assert_eq!(reloaded.urgent_threshold_days, None);

    // Promote again: the remembered threshold comes back after a reload.
    let promoted =
        apply_quadrant(&reloaded, Category::ImportantUrgent, &(later + Duration::minutes(1)));
    db.save(&promoted).unwrap();
    let reloaded = db.get("tax").unwrap().unwrap();
    assert_eq!(reloaded.urgent_threshold_days, Some(7));
    assert!(reloaded.manual_urgent);
}

#[test]
fn test_completed_task_lingers_then_leaves_quadrant() {
    let mut db = TriageDb::open_memory().unwrap();
    let now = monday_9am();
    let visibility = Config::default().completed_visibility();

    let task = Task::new("Call plumber", &now)
        .with_id("call")
        .with_importance(Importance::High)
        .with_manual_urgent(true);
    db.save(&toggle_completion(&task, &now)).unwrap();

    let tasks = db.fetch_all().unwrap();
    let view = QuadrantView::Only(Category::ImportantUrgent);
    assert_eq!(filter_tasks(&tasks, view, &(now + Duration::seconds(2)), visibility).len(), 1);
    assert!(filter_tasks(&tasks, view, &(now + Duration::seconds(10)), visibility).is_empty());
    let completed = QuadrantView::Only(Category::Completed);
    let an_hour_later = now + Duration::hours(1);
    assert_eq!(filter_tasks(&tasks, completed, &an_hour_later, visibility).len(), 1);
}

#[test]
fn test_sort_methods_over_stored_tasks() {
    let mut db = TriageDb::open_memory().unwrap();
    let now = monday_9am();

    db.save(&Task::new("b", &now).with_id("1")).unwrap();
    db.save(&Task::new("a", &(now + Duration::minutes(1))).with_id("2").pinned())
        .unwrap();
    db.save(
        &Task::new("c", &(now + Duration::minutes(2)))
            .with_id("3")
            .with_target_date(now + Duration::days(1)),
    )
    .unwrap();

    let tasks = db.fetch_all().unwrap();
    let ids = |method| -> Vec<String> {
        sort_tasks(&tasks, method).into_iter().map(|t| t.id).collect()
    };
    assert_eq!(ids(SortMethod::Intelligence), vec!["2", "3", "1"]);
    assert_eq!(ids(SortMethod::Title), vec!["2", "1", "3"]);
    assert_eq!(ids(SortMethod::CreationDate), vec!["1", "2", "3"]);
    assert_eq!(ids(SortMethod::TargetDate), vec!["3", "1", "2"]);
}

#[test]
fn test_day_timeline_workflow() {
    let mut db = TriageDb::open_memory().unwrap();
    let now = monday_9am();
    let day = now.date_naive();

    let standup = DailyEvent::new("Standup", day, now, 1800, &now).with_id("standup");
    let focus =
        DailyEvent::new("Focus", day, now + Duration::minutes(15), 3600, &now).with_id("focus");
    let lunch =
        DailyEvent::new("Lunch", day, now + Duration::hours(3), 3600, &now).with_id("lunch");
    for event in [&standup, &focus, &lunch] {
        db.save_event(event).unwrap();
    }

    let events = db.fetch_day(day).unwrap();
    let geometry = TimelineLayout::default().layout(&events, &Utc);
    assert_eq!(geometry["standup"].column_count, 2);
    assert_eq!(geometry["focus"].column_index, 1);
    assert_eq!(geometry["lunch"].column_count, 1);
    assert_eq!(geometry["lunch"].top_offset, 12.0 * 60.0);

    let active = select_active(&events, &(now + Duration::minutes(20))).unwrap();
    assert_eq!(active.event.id, "standup");
    assert_eq!(active.display_label(), "Standup +1");

    db.save_event(&toggle_event_completion(&standup, &now)).unwrap();
    let events = db.fetch_day(day).unwrap();
    let active = select_active(&events, &(now + Duration::minutes(20))).unwrap();
    assert_eq!(active.event.id, "focus");
    assert_eq!(active.overlap_count, 0);
}

#[test]
fn test_on_disk_database_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eisenhower.db");
    let now = monday_9am();

    {
        let mut db = TriageDb::open_at(&path).unwrap();
        db.save(&Task::new("Persist me", &now).with_id("p1")).unwrap();
        db.save_event(&DailyEvent::new("Block", now.date_naive(), now, 900, &now).with_id("e1"))
            .unwrap();
    }

    let db = TriageDb::open_at(&path).unwrap();
    assert_eq!(db.get("p1").unwrap().unwrap().title, "Persist me");
    assert_eq!(db.fetch_day(now.date_naive()).unwrap().len(), 1);
}
