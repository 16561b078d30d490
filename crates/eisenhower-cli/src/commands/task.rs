//! Quadrant task commands for CLI.

use chrono::{DateTime, Local};
use clap::Subcommand;
use eisenhower_core::{
    apply_quadrant, edit_fields, filter_tasks, is_overdue, is_urgent, quadrant, set_pinned,
    sort_tasks, toggle_completion, Category, Config, CoreError, Importance, QuadrantView,
    SortMethod, Task, TaskEdit, TaskStore, TriageDb,
};
use serde::Serialize;
use tracing::debug;

use super::{parse_when, print_json, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// low, normal or high
        #[arg(long, default_value = "normal")]
        importance: Importance,
        /// Mark urgent by hand
        #[arg(long)]
        urgent: bool,
        /// Target date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
        /// Days before the target date at which the task turns urgent
        #[arg(long, requires = "due")]
        threshold: Option<u32>,
        /// Use the configured default threshold
        #[arg(long, requires = "due", conflicts_with = "threshold")]
        auto_urgent: bool,
        /// Pin to the top of every view
        #[arg(long)]
        pin: bool,
    },
    /// List tasks in a quadrant view
    List {
        /// all, or one of important_urgent, important_not_urgent,
        /// urgent_not_important, not_important_not_urgent, completed
        #[arg(long, default_value = "all")]
        view: QuadrantView,
        /// intelligence, target_date, creation_date or title (default from config)
        #[arg(long)]
        sort: Option<SortMethod>,
    },
    /// Show task details
    Show {
        /// Task ID
        id: String,
    },
    /// Edit task fields
    Edit {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        importance: Option<Importance>,
        #[arg(long)]
        urgent: Option<bool>,
        /// New target date (YYYY-MM-DD or RFC 3339)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the target date (and with it the threshold)
        #[arg(long)]
        clear_due: bool,
        #[arg(long, conflicts_with = "clear_threshold")]
        threshold: Option<u32>,
        /// Switch back to manual urgency
        #[arg(long)]
        clear_threshold: bool,
        #[arg(long)]
        pin: Option<bool>,
    },
    /// Move a task to another quadrant
    Move {
        /// Task ID
        id: String,
        /// Target quadrant
        category: Category,
    },
    /// Toggle completion
    Toggle {
        /// Task ID
        id: String,
    },
    /// Pin or unpin a task
    Pin {
        /// Task ID
        id: String,
        /// Unpin instead
        #[arg(long)]
        off: bool,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

/// A task plus the facets derived at the moment of listing.
#[derive(Serialize)]
struct TaskRow {
    #[serde(flatten)]
    task: Task,
    quadrant: Category,
    is_urgent: bool,
    is_overdue: bool,
}

impl TaskRow {
    fn new(task: Task, now: &DateTime<Local>) -> Self {
        TaskRow {
            quadrant: quadrant(&task, now),
            is_urgent: is_urgent(&task, now),
            is_overdue: is_overdue(&task, now),
            task,
        }
    }
}

fn load(db: &TriageDb, id: &str) -> Result<Task, CoreError> {
    db.get(id)?.ok_or_else(|| CoreError::task_not_found(id))
}

fn store(db: &mut TriageDb, task: Task, now: &DateTime<Local>) -> CliResult {
    db.save(&task)?;
    print_json(&TaskRow::new(task, now))
}

pub fn run(action: TaskAction) -> CliResult {
    let mut db = TriageDb::open()?;
    let config = Config::load_or_default();
    let now = Local::now();

    match action {
        TaskAction::Add {
            title,
            importance,
            urgent,
            due,
            threshold,
            auto_urgent,
            pin,
        } => {
            if title.trim().is_empty() {
                return Err("task title must not be empty".into());
            }
            let target_date = due.as_deref().map(parse_when).transpose()?;
            let threshold = if auto_urgent {
                Some(config.triage.default_threshold_days)
            } else {
                threshold
            };

            let draft = Task::new(title.trim(), &now);
            let edit = TaskEdit {
                importance,
                manual_urgent: urgent,
                pinned: pin,
                target_date,
                urgent_threshold_days: threshold,
                ..TaskEdit::from_task(&draft)
            };
            let task = edit_fields(&draft, edit, &now);
            store(&mut db, task, &now)?;
        }
        TaskAction::List { view, sort } => {
            let tasks = db.fetch_all()?;
            debug!(?view, ?sort, total = tasks.len(), "listing tasks");
            let visible = filter_tasks(&tasks, view, &now, config.completed_visibility());
            let sorted = sort_tasks(&visible, sort.unwrap_or(config.triage.sort));
            let rows: Vec<TaskRow> = sorted.into_iter().map(|t| TaskRow::new(t, &now)).collect();
            print_json(&rows)?;
        }
        TaskAction::Show { id } => {
            print_json(&TaskRow::new(load(&db, &id)?, &now))?;
        }
        TaskAction::Edit {
            id,
            title,
            importance,
            urgent,
            due,
            clear_due,
            threshold,
            clear_threshold,
            pin,
        } => {
            let task = load(&db, &id)?;
            let mut edit = TaskEdit::from_task(&task);

            if let Some(t) = title {
                if t.trim().is_empty() {
                    return Err("task title must not be empty".into());
                }
                edit.title = t.trim().to_string();
            }
            if let Some(i) = importance {
                edit.importance = i;
            }
            if let Some(u) = urgent {
                edit.manual_urgent = u;
            }
            if let Some(p) = pin {
                edit.pinned = p;
            }
            if let Some(d) = due {
                edit.target_date = Some(parse_when(&d)?);
            }
            if clear_due {
                edit.target_date = None;
            }
            if let Some(t) = threshold {
                if edit.target_date.is_none() {
                    return Err("a threshold needs a target date".into());
                }
                edit.urgent_threshold_days = Some(t);
            }
            if clear_threshold {
                edit.urgent_threshold_days = None;
            }

            let task = edit_fields(&task, edit, &now);
            store(&mut db, task, &now)?;
        }
        TaskAction::Move { id, category } => {
            let task = load(&db, &id)?;
            let moved = apply_quadrant(&task, category, &now);
            store(&mut db, moved, &now)?;
        }
        TaskAction::Toggle { id } => {
            let task = load(&db, &id)?;
            store(&mut db, toggle_completion(&task, &now), &now)?;
        }
        TaskAction::Pin { id, off } => {
            let task = load(&db, &id)?;
            store(&mut db, set_pinned(&task, !off, &now), &now)?;
        }
        TaskAction::Delete { id } => {
            if !db.delete(&id)? {
                return Err(CoreError::task_not_found(&id).into());
            }
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
