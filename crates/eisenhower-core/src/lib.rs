//! # Eisenhower Core Library
//!
//! Triage engine for an Eisenhower-matrix task manager plus a day timeline.
//! All logic is UI-free: the CLI binary and any GUI are thin layers over the
//! same pure functions, and every function that depends on the clock takes
//! `now` explicitly.
//!
//! ## Architecture
//!
//! - **Classification**: urgency, overdue and quadrant derived from a task's
//!   facets and the calendar; drag-between-quadrants transitions that remember
//!   what the user configured
//! - **Ordering**: the "intelligence" sort and the simple sorts
//! - **Timeline**: column packing for overlapping events, snapped drag/resize,
//!   and the active-event query for live displays
//! - **Storage**: SQLite persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`Task`]: Quadrant task value
//! - [`DailyEvent`]: Time-boxed timeline event
//! - [`TimelineLayout`]: Column geometry for a day of events
//! - [`TriageDb`]: Task and event persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod storage;
pub mod task;
pub mod timeline;

pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use storage::{data_dir, Config, EventStore, MemoryStore, TaskStore, TriageDb};
pub use task::classify::{
    apply_quadrant, days_remaining, filter_tasks, is_overdue, is_urgent, quadrant,
};
pub use task::ordering::{compare_intelligence, sort_tasks};
pub use task::{
    edit_fields, set_pinned, toggle_completion, Category, Importance, QuadrantView, SortMethod,
    Task, TaskEdit, TaskMemory,
};
pub use timeline::{
    compute_layout, select_active, toggle_event_completion, ActiveEvent, ActivitySnapshot,
    ActivityTracker, ActivityUpdate, DailyEvent, Geometry, SnapGrid, TimeBox, TimeBoxed,
    TimelineLayout, DEFAULT_COLOR,
};
