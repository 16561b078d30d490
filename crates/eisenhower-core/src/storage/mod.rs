//! Persistence collaborators and configuration.
//!
//! The engines never persist anything themselves. Callers apply an engine
//! result and hand the new value to a [`TaskStore`] / [`EventStore`]; a failed
//! write is reported back, never retried here.

mod config;
pub mod database;
pub mod memory;

pub use config::{ActivityConfig, Config, TimelineConfig, TriageConfig};
pub use database::TriageDb;
pub use memory::MemoryStore;

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::task::Task;
use crate::timeline::DailyEvent;

/// Storage for quadrant tasks.
pub trait TaskStore {
    /// All tasks, most recently modified first.
    fn fetch_all(&self) -> Result<Vec<Task>>;

    fn get(&self, id: &str) -> Result<Option<Task>>;

    /// Insert or replace by id.
    fn save(&mut self, task: &Task) -> Result<()>;

    /// Returns whether a task was removed.
    fn delete(&mut self, id: &str) -> Result<bool>;
}

/// Storage for daily timeline events.
pub trait EventStore {
    /// Events scheduled on `day`, by start time.
    fn fetch_day(&self, day: NaiveDate) -> Result<Vec<DailyEvent>>;

    fn get_event(&self, id: &str) -> Result<Option<DailyEvent>>;

    /// Insert or replace by id.
    fn save_event(&mut self, event: &DailyEvent) -> Result<()>;

    /// Returns whether an event was removed.
    fn delete_event(&mut self, id: &str) -> Result<bool>;
}

/// Returns `~/.config/eisenhower[-dev]/` based on EISENHOWER_ENV.
///
/// Set EISENHOWER_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if no home directory is known or creating the
/// directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir().ok_or(ConfigError::NoDataDir)?.join(".config");

    let env = std::env::var("EISENHOWER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("eisenhower-dev")
    } else {
        base_dir.join("eisenhower")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
