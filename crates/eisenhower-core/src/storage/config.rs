//! TOML-based application configuration.
//!
//! Stores user preferences for:
//! - Triage defaults (urgency threshold, completed-task visibility, sort)
//! - Timeline geometry and the editing grid
//! - The live-activity display
//!
//! Configuration is stored at `~/.config/eisenhower/config.toml`.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::task::SortMethod;
use crate::timeline::{ActivityTracker, SnapGrid, TimelineLayout};

/// Task triage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Threshold offered when a due date is first set
    #[serde(default = "default_threshold_days")]
    pub default_threshold_days: u32,
    /// Seconds a completed task stays in quadrant views
    #[serde(default = "default_completed_visibility_secs")]
    pub completed_visibility_secs: u64,
    #[serde(default)]
    pub sort: SortMethod,
}

/// Timeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_pixels_per_hour")]
    pub pixels_per_hour: f64,
    #[serde(default)]
    pub top_padding: f64,
    #[serde(default = "default_snap_minutes")]
    pub snap_minutes: u32,
    #[serde(default = "default_min_duration_secs")]
    pub min_duration_secs: i64,
}

/// Live-activity configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: i64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/eisenhower/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub triage: TriageConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
}

// Default functions
fn default_threshold_days() -> u32 {
    3
}
fn default_completed_visibility_secs() -> u64 {
    3
}
fn default_pixels_per_hour() -> f64 {
    60.0
}
fn default_snap_minutes() -> u32 {
    15
}
fn default_min_duration_secs() -> i64 {
    900
}
fn default_true() -> bool {
    true
}
fn default_stale_after_secs() -> i64 {
    600
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            default_threshold_days: default_threshold_days(),
            completed_visibility_secs: default_completed_visibility_secs(),
            sort: SortMethod::default(),
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            pixels_per_hour: default_pixels_per_hour(),
            top_padding: 0.0,
            snap_minutes: default_snap_minutes(),
            min_duration_secs: default_min_duration_secs(),
        }
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stale_after_secs: default_stale_after_secs(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<i64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) => return Err(unknown()),
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::path()?)
    }

    /// Same as [`Config::load`] for an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config missing, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::path()?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load config, using defaults");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory only. Callers persist with
    /// [`Config::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| {
            CoreError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(())
    }

    /// All leaf keys with their current values, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let Ok(json) = serde_json::to_value(self) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if let serde_json::Value::Object(sections) = json {
            for (section, fields) in sections {
                if let serde_json::Value::Object(fields) = fields {
                    for (name, value) in fields {
                        let value = match value {
                            serde_json::Value::String(s) => s,
                            other => other.to_string(),
                        };
                        out.push((format!("{section}.{name}"), value));
                    }
                }
            }
        }
        out
    }

    pub fn completed_visibility(&self) -> Duration {
        i64::try_from(self.triage.completed_visibility_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }

    /// How long past its end a live-activity snapshot stays current.
    pub fn stale_after(&self) -> Duration {
        Duration::try_seconds(self.activity.stale_after_secs).unwrap_or(Duration::MAX)
    }

    pub fn timeline_layout(&self) -> TimelineLayout {
        TimelineLayout::new(self.timeline.pixels_per_hour)
            .with_top_padding(self.timeline.top_padding)
    }

    pub fn snap_grid(&self) -> SnapGrid {
        SnapGrid::new(self.timeline.snap_minutes, self.timeline.min_duration_secs)
    }

    pub fn activity_tracker(&self) -> ActivityTracker {
        ActivityTracker::new(self.activity.enabled, self.stale_after())
    }
}
