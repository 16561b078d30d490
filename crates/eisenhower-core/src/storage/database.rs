//! SQLite-based storage for quadrant tasks and daily events.
//!
//! Tables are created with `CREATE TABLE IF NOT EXISTS`; there is no schema
//! versioning. Timestamps are stored as RFC 3339 text and days as `%Y-%m-%d`.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::{debug, warn};

use super::{data_dir, EventStore, TaskStore};
use crate::error::{DatabaseError, Result};
use crate::task::{Importance, Task, TaskMemory};
use crate::timeline::DailyEvent;

const DAY_FORMAT: &str = "%Y-%m-%d";

const TASK_COLUMNS: &str = "id, title, created_at, last_modified_at, target_date, is_completed,
    completed_at, importance, manual_urgent, urgent_threshold_days, original_importance,
    original_urgent_threshold_days, is_pinned";

const EVENT_COLUMNS: &str = "id, title, scheduled_day, start_time, duration_secs, color_tag,
    notes, linked_task_id, is_completed, completed_at, created_at";

// === Helper Functions ===

/// Parse datetime from RFC3339 string with fallback to the epoch
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!(value = dt_str, error = %e, "unparseable stored timestamp");
            DateTime::<Utc>::UNIX_EPOCH
        })
}

fn parse_datetime_opt(dt_str: Option<String>) -> Option<DateTime<Utc>> {
    dt_str
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse importance from database string
fn parse_importance(s: &str) -> Importance {
    s.parse().unwrap_or_else(|_| {
        warn!(value = s, "unknown stored importance, using normal");
        Importance::Normal
    })
}

fn row_to_task(row: &Row) -> Result<Task, rusqlite::Error> {
    let created_at: String = row.get(2)?;
    let last_modified_at: String = row.get(3)?;
    let importance: String = row.get(7)?;
    let original_importance: Option<String> = row.get(10)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        created_at: parse_datetime_fallback(&created_at),
        last_modified_at: parse_datetime_fallback(&last_modified_at),
        target_date: parse_datetime_opt(row.get(4)?),
        is_completed: row.get(5)?,
        completed_at: parse_datetime_opt(row.get(6)?),
        importance: parse_importance(&importance),
        manual_urgent: row.get(8)?,
        urgent_threshold_days: row.get(9)?,
        memory: TaskMemory {
            importance: original_importance.as_deref().map(parse_importance),
            urgent_threshold_days: row.get(11)?,
        },
        is_pinned: row.get(12)?,
    })
}

fn row_to_event(row: &Row) -> Result<DailyEvent, rusqlite::Error> {
    let scheduled_day: String = row.get(2)?;
    let start_time: String = row.get(3)?;
    let created_at: String = row.get(10)?;
    let start_time = parse_datetime_fallback(&start_time);
    let scheduled_day = NaiveDate::parse_from_str(&scheduled_day, DAY_FORMAT).unwrap_or_else(|_| {
        warn!(value = %scheduled_day, "unparseable scheduled day, using start date");
        start_time.date_naive()
    });

    Ok(DailyEvent {
        id: row.get(0)?,
        title: row.get(1)?,
        scheduled_day,
        start_time,
        duration_secs: row.get(4)?,
        color_tag: row.get(5)?,
        notes: row.get(6)?,
        linked_task_id: row.get(7)?,
        is_completed: row.get(8)?,
        completed_at: parse_datetime_opt(row.get(9)?),
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// SQLite database holding tasks and daily events.
pub struct TriageDb {
    conn: Connection,
}

impl TriageDb {
    /// Open the database at `~/.config/eisenhower/eisenhower.db`.
    ///
    /// Creates the database file and tables if they don't exist.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("eisenhower.db"))
    }

    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        debug!(path = %path.display(), "opened triage database");
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id                              TEXT PRIMARY KEY,
                title                           TEXT NOT NULL,
                created_at                      TEXT NOT NULL,
                last_modified_at                TEXT NOT NULL,
                target_date                     TEXT,
                is_completed                    INTEGER NOT NULL DEFAULT 0,
                completed_at                    TEXT,
                importance                      TEXT NOT NULL DEFAULT 'normal',
                manual_urgent                   INTEGER NOT NULL DEFAULT 0,
                urgent_threshold_days           INTEGER,
                original_importance             TEXT,
                original_urgent_threshold_days  INTEGER,
                is_pinned                       INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS daily_events (
                id              TEXT PRIMARY KEY,
                title           TEXT NOT NULL,
                scheduled_day   TEXT NOT NULL,
                start_time      TEXT NOT NULL,
                duration_secs   INTEGER NOT NULL,
                color_tag       TEXT NOT NULL,
                notes           TEXT,
                linked_task_id  TEXT,
                is_completed    INTEGER NOT NULL DEFAULT 0,
                completed_at    TEXT,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_last_modified ON tasks(last_modified_at);
            CREATE INDEX IF NOT EXISTS idx_daily_events_day ON daily_events(scheduled_day);",
        )
    }
}

impl TaskStore for TriageDb {
    fn fetch_all(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY last_modified_at DESC, id"
        ))?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn get(&self, id: &str) -> Result<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;
        Ok(stmt.query_row(params![id], row_to_task).optional()?)
    }

    fn save(&mut self, task: &Task) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO tasks ({TASK_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            params![
                task.id,
                task.title,
                task.created_at.to_rfc3339(),
                task.last_modified_at.to_rfc3339(),
                task.target_date.map(|d| d.to_rfc3339()),
                task.is_completed,
                task.completed_at.map(|d| d.to_rfc3339()),
                task.importance.as_str(),
                task.manual_urgent,
                task.urgent_threshold_days,
                task.memory.importance.map(Importance::as_str),
                task.memory.urgent_threshold_days,
                task.is_pinned,
            ],
        )?;
        debug!(task_id = %task.id, "saved task");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let removed = self.conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}

impl EventStore for TriageDb {
    fn fetch_day(&self, day: NaiveDate) -> Result<Vec<DailyEvent>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM daily_events
             WHERE scheduled_day = ?1
             ORDER BY start_time, id"
        ))?;
        let events = stmt
            .query_map(params![day.format(DAY_FORMAT).to_string()], row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn get_event(&self, id: &str) -> Result<Option<DailyEvent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {EVENT_COLUMNS} FROM daily_events WHERE id = ?1"))?;
        Ok(stmt.query_row(params![id], row_to_event).optional()?)
    }

    fn save_event(&mut self, event: &DailyEvent) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO daily_events ({EVENT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                event.id,
                event.title,
                event.scheduled_day.format(DAY_FORMAT).to_string(),
                event.start_time.to_rfc3339(),
                event.duration_secs,
                event.color_tag,
                event.notes,
                event.linked_task_id,
                event.is_completed,
                event.completed_at.map(|d| d.to_rfc3339()),
                event.created_at.to_rfc3339(),
            ],
        )?;
        debug!(event_id = %event.id, "saved event");
        Ok(())
    }

    fn delete_event(&mut self, id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM daily_events WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}
