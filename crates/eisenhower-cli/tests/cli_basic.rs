//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary HOME so the
//! database and config never touch the real data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_eisenhower"))
        .args(args)
        .env("HOME", home)
        .env_remove("EISENHOWER_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_task_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    let task = run_json(
        home.path(),
        &["task", "add", "Write report", "--importance", "high", "--urgent"],
    );
    assert_eq!(task["quadrant"], "important_urgent");

    let tasks = run_json(home.path(), &["task", "list"]);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Write report");
}

#[test]
fn test_task_move_round_trip_restores_threshold() {
    let home = tempfile::tempdir().unwrap();
    let task = run_json(
        home.path(),
        &["task", "add", "Taxes", "--due", "2099-01-01", "--threshold", "7"],
    );
    let id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["quadrant"], "not_important_not_urgent");

    let moved = run_json(home.path(), &["task", "move", &id, "important_urgent"]);
    assert_eq!(moved["quadrant"], "important_urgent");
    assert_eq!(moved["importance"], "high");
    assert!(moved["urgent_threshold_days"].as_u64().unwrap() > 7);

    let back = run_json(home.path(), &["task", "move", &id, "not_important_not_urgent"]);
    assert_eq!(back["importance"], "normal");
    assert!(back["urgent_threshold_days"].is_null());
}

#[test]
fn test_task_view_filter() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["task", "add", "Urgent", "--urgent"]);
    run_json(home.path(), &["task", "add", "Later"]);

    let urgent = run_json(home.path(), &["task", "list", "--view", "urgent_not_important"]);
    assert_eq!(urgent.as_array().unwrap().len(), 1);
    assert_eq!(urgent[0]["title"], "Urgent");
}

#[test]
fn test_task_toggle_and_delete() {
    let home = tempfile::tempdir().unwrap();
    let task = run_json(home.path(), &["task", "add", "Done soon"]);
    let id = task["id"].as_str().unwrap().to_string();

    let toggled = run_json(home.path(), &["task", "toggle", &id]);
    assert_eq!(toggled["is_completed"], true);
    assert_eq!(toggled["quadrant"], "completed");

    let (stdout, _, code) = run_cli(home.path(), &["task", "delete", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Task deleted"));

    let (_, stderr, code) = run_cli(home.path(), &["task", "show", &id]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_day_layout_and_active() {
    let home = tempfile::tempdir().unwrap();
    let a = run_json(
        home.path(),
        &["day", "add", "Standup", "--start", "09:00", "--minutes", "30", "--day", "2030-05-06"],
    );
    let b = run_json(
        home.path(),
        &["day", "add", "Focus", "--start", "09:15", "--day", "2030-05-06"],
    );

    let layout = run_json(home.path(), &["day", "layout", "--day", "2030-05-06"]);
    let a_id = a["id"].as_str().unwrap();
    let b_id = b["id"].as_str().unwrap();
    assert_eq!(layout[a_id]["column_count"], 2);
    assert_eq!(layout[b_id]["column_index"], 1);

    let start = a["start_time"].as_str().unwrap();
    let at = chrono::DateTime::parse_from_rfc3339(start).unwrap() + chrono::Duration::minutes(20);
    let active = run_json(home.path(), &["day", "active", "--at", &at.to_rfc3339()]);
    assert_eq!(active["label"], "Standup +1");
}

#[test]
fn test_day_resize_rejects_short_duration() {
    let home = tempfile::tempdir().unwrap();
    let event = run_json(
        home.path(),
        &["day", "add", "Short", "--start", "10:00", "--minutes", "15", "--day", "2030-05-06"],
    );
    let id = event["id"].as_str().unwrap();

    let (_, stderr, code) = run_cli(home.path(), &["day", "resize", id, "--start", "10:15"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("below the minimum"));
}

#[test]
fn test_day_minutes_capped_at_one_day() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        home.path(),
        &["day", "add", "Huge", "--start", "09:00", "--minutes", "5000000", "--day", "2030-05-06"],
    );
    assert_eq!(code, 2);
    assert!(stderr.contains("--minutes"));

    let events = run_json(home.path(), &["day", "list", "--day", "2030-05-06"]);
    assert!(events.as_array().unwrap().is_empty());

    let whole_day = run_json(
        home.path(),
        &["day", "add", "Offsite", "--start", "00:00", "--minutes", "1440", "--day", "2030-05-06"],
    );
    let id = whole_day["id"].as_str().unwrap();
    let (_, _, code) = run_cli(home.path(), &["day", "resize", id, "--minutes", "1441"]);
    assert_eq!(code, 2);

    let layout = run_json(home.path(), &["day", "layout", "--day", "2030-05-06"]);
    assert_eq!(layout[id]["column_count"], 1);
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "timeline.snap_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "15");

    let (_, _, code) = run_cli(home.path(), &["config", "set", "triage.sort", "title"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "triage.sort"]);
    assert_eq!(stdout.trim(), "title");

    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "triage.nope", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key"));
}
