//! Day timeline.
//!
//! This module provides:
//! - Daily events and their editing transitions on a snap grid
//! - Overlap layout (column packing) for rendering a day
//! - The "currently active event" query used by live displays

mod active;
mod edit;
mod event;
mod layout;

pub use active::{select_active, ActiveEvent, ActivitySnapshot, ActivityTracker, ActivityUpdate};
pub use edit::SnapGrid;
pub use event::{toggle_event_completion, DailyEvent, TimeBox, TimeBoxed, DEFAULT_COLOR};
pub use layout::{compute_layout, Geometry, TimelineLayout};
