//! Daily timeline commands for CLI.

use chrono::Local;
use clap::Subcommand;
use eisenhower_core::{
    select_active, toggle_event_completion, ActivitySnapshot, Config, CoreError, DailyEvent,
    EventStore, TriageDb, DEFAULT_COLOR,
};
use std::collections::BTreeMap;
use tracing::debug;

use super::{day_or_today, local_at, parse_clock, parse_when, print_json, CliResult};

#[derive(Subcommand)]
pub enum DayAction {
    /// Schedule an event
    Add {
        /// Event title
        title: String,
        /// Start time (HH:MM, local)
        #[arg(long)]
        start: String,
        /// Length in minutes (at most one day)
        #[arg(long, default_value = "60", value_parser = minutes_parser())]
        minutes: i64,
        /// Day (YYYY-MM-DD, default today)
        #[arg(long)]
        day: Option<String>,
        /// Color tag
        #[arg(long, default_value = DEFAULT_COLOR)]
        color: String,
        #[arg(long)]
        notes: Option<String>,
        /// Link to a quadrant task
        #[arg(long)]
        task: Option<String>,
    },
    /// List a day's events
    List {
        #[arg(long)]
        day: Option<String>,
    },
    /// Print column geometry for a day's events
    Layout {
        #[arg(long)]
        day: Option<String>,
    },
    /// Move an event to a new start, keeping its length
    Move {
        /// Event ID
        id: String,
        /// New start (HH:MM, local)
        #[arg(long)]
        start: String,
    },
    /// Drag an event's top or bottom edge
    Resize {
        /// Event ID
        id: String,
        /// New start with the end held fixed (HH:MM, local)
        #[arg(long, conflicts_with = "minutes", required_unless_present = "minutes")]
        start: Option<String>,
        /// New length in minutes with the start held fixed (at most one day)
        #[arg(long, value_parser = minutes_parser())]
        minutes: Option<i64>,
    },
    /// Toggle completion
    Toggle {
        /// Event ID
        id: String,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
    /// Show the currently active event
    Active {
        /// Evaluate at this instant instead of now (RFC 3339)
        #[arg(long)]
        at: Option<String>,
    },
}

const MAX_EVENT_MINUTES: i64 = 24 * 60;

fn minutes_parser() -> clap::builder::RangedI64ValueParser<i64> {
    clap::value_parser!(i64).range(1..=MAX_EVENT_MINUTES)
}

fn load(db: &TriageDb, id: &str) -> Result<DailyEvent, CoreError> {
    db.get_event(id)?.ok_or_else(|| CoreError::event_not_found(id))
}

fn store(db: &mut TriageDb, event: &DailyEvent) -> CliResult {
    db.save_event(event)?;
    print_json(event)
}

pub fn run(action: DayAction) -> CliResult {
    let mut db = TriageDb::open()?;
    let config = Config::load_or_default();
    let grid = config.snap_grid();
    let now = Local::now();

    match action {
        DayAction::Add {
            title,
            start,
            minutes,
            day,
            color,
            notes,
            task,
        } => {
            if title.trim().is_empty() {
                return Err("event title must not be empty".into());
            }
            let day = day_or_today(day.as_deref(), &now)?;
            let raw_start = local_at(day, parse_clock(&start)?)?;

            let duration_secs = grid
                .snap_duration(minutes * 60)
                .max(grid.min_duration_secs);

            let start = grid.snap_time(raw_start, &Local);
            let mut event =
                DailyEvent::new(title.trim(), day, start, duration_secs, &now).with_color(color);
            if let Some(n) = notes {
                event = event.with_notes(n);
            }
            if let Some(t) = task {
                event = event.linked_to(t);
            }
            store(&mut db, &event)?;
        }
        DayAction::List { day } => {
            let day = day_or_today(day.as_deref(), &now)?;
            print_json(&db.fetch_day(day)?)?;
        }
        DayAction::Layout { day } => {
            let day = day_or_today(day.as_deref(), &now)?;
            let events = db.fetch_day(day)?;
            let geometry: BTreeMap<_, _> = config
                .timeline_layout()
                .layout(&events, &Local)
                .into_iter()
                .collect();
            print_json(&geometry)?;
        }
        DayAction::Move { id, start } => {
            let event = load(&db, &id)?;
            let raw_start = local_at(event.scheduled_day, parse_clock(&start)?)?;
            store(&mut db, &grid.move_event(&event, raw_start, &Local))?;
        }
        DayAction::Resize { id, start, minutes } => {
            let event = load(&db, &id)?;
            let resized = match (start, minutes) {
                (Some(start), _) => {
                    let raw_start = local_at(event.scheduled_day, parse_clock(&start)?)?;
                    grid.resize_start(&event, raw_start, &Local).map_err(CoreError::from)?
                }
                (None, Some(minutes)) => grid.resize_end(&event, minutes * 60),
                (None, None) => return Err("pass --start or --minutes".into()),
            };
            store(&mut db, &resized)?;
        }
        DayAction::Toggle { id } => {
            let event = load(&db, &id)?;
            store(&mut db, &toggle_event_completion(&event, &now))?;
        }
        DayAction::Delete { id } => {
            if !db.delete_event(&id)? {
                return Err(CoreError::event_not_found(&id).into());
            }
            println!("Event deleted: {id}");
        }
        DayAction::Active { at } => {
            let at = match at {
                Some(value) => parse_when(&value)?.with_timezone(&Local),
                None => now,
            };
            if !config.activity.enabled {
                println!("live activity disabled");
                return Ok(());
            }
            let events = db.fetch_day(at.date_naive())?;
            debug!(at = %at, candidates = events.len(), "querying active event");
            match select_active(&events, &at) {
                Some(active) => {
                    print_json(&ActivitySnapshot::from_active(&active, config.stale_after()))?;
                }
                None => println!("no active event"),
            }
        }
    }
    Ok(())
}
