//! Overlap layout for a day timeline.
//!
//! Events are sorted by start (longer first on equal starts), split into
//! maximal overlap clusters, and each cluster is packed greedily: an event
//! reuses the first column whose last event has ended, otherwise it opens a
//! new column. Every event in a cluster gets `1 / column_count` of the width.
//!
//! The packing is locally minimal per cluster, not globally optimal. Three
//! mutually overlapping events always produce three equal columns.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::event::TimeBoxed;

/// Placement of one event.
///
/// `column_x` and `column_width` are fractions of the available width;
/// `top_offset` and `height` are pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub column_index: usize,
    pub column_count: usize,
    pub column_x: f64,
    pub column_width: f64,
    pub top_offset: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineLayout {
    pub pixels_per_hour: f64,
    /// Added to every `top_offset`
    pub top_padding: f64,
}

impl TimelineLayout {
    pub fn new(pixels_per_hour: f64) -> Self {
        Self {
            pixels_per_hour,
            top_padding: 0.0,
        }
    }

    pub fn with_top_padding(mut self, top_padding: f64) -> Self {
        self.top_padding = top_padding;
        self
    }

    /// Compute geometry for every event, keyed by id.
    ///
    /// Wall-clock hours for the vertical axis are read in `tz`. If two events
    /// share an id, the one laid out last wins.
    pub fn layout<T: TimeBoxed, Tz: TimeZone>(
        &self,
        events: &[T],
        tz: &Tz,
    ) -> HashMap<String, Geometry> {
        let mut results = HashMap::with_capacity(events.len());
        if events.is_empty() {
            return results;
        }

        let mut sorted: Vec<&T> = events.iter().collect();
        sorted.sort_by(|a, b| {
            a.start_time()
                .cmp(&b.start_time())
                .then_with(|| b.duration_secs().cmp(&a.duration_secs()))
                .then_with(|| a.id().cmp(b.id()))
        });

        for cluster in overlap_clusters(&sorted) {
            let columns = pack_columns(cluster);
            let column_count = columns.iter().copied().max().map_or(1, |max| max + 1);
            let column_width = 1.0 / column_count as f64;

            for (event, column_index) in cluster.iter().zip(columns) {
                let geometry = Geometry {
                    column_index,
                    column_count,
                    column_x: column_index as f64 * column_width,
                    column_width,
                    top_offset: self.top_offset(&event.start_time(), tz),
                    height: self.height(event.duration_secs()),
                };
                results.insert(event.id().to_string(), geometry);
            }
        }

        results
    }

    fn top_offset<Tz: TimeZone>(&self, start: &DateTime<Utc>, tz: &Tz) -> f64 {
        let local = start.with_timezone(tz);
        let minutes = f64::from(local.hour() * 60 + local.minute());
        minutes / 60.0 * self.pixels_per_hour + self.top_padding
    }

    fn height(&self, duration_secs: i64) -> f64 {
        duration_secs as f64 / 3600.0 * self.pixels_per_hour
    }
}

impl Default for TimelineLayout {
    fn default() -> Self {
        Self::new(60.0)
    }
}

/// Split start-sorted events into maximal runs of transitively overlapping
/// intervals. An event touching the cluster end starts a new cluster.
fn overlap_clusters<'a, T: TimeBoxed>(sorted: &'a [&'a T]) -> Vec<&'a [&'a T]> {
    let mut clusters = Vec::new();
    let mut cluster_start = 0;
    let mut cluster_end: Option<DateTime<Utc>> = None;

    for (i, event) in sorted.iter().enumerate() {
        match cluster_end {
            Some(end) if event.start_time() < end => {
                cluster_end = Some(end.max(event.end_time()));
            }
            Some(_) => {
                clusters.push(&sorted[cluster_start..i]);
                cluster_start = i;
                cluster_end = Some(event.end_time());
            }
            None => cluster_end = Some(event.end_time()),
        }
    }
    if cluster_start < sorted.len() {
        clusters.push(&sorted[cluster_start..]);
    }
    clusters
}

/// Greedy first-fit column assignment, one index per event in cluster order.
fn pack_columns<T: TimeBoxed>(cluster: &[&T]) -> Vec<usize> {
    let mut column_ends: Vec<DateTime<Utc>> = Vec::new();
    cluster
        .iter()
        .map(|event| {
            let start = event.start_time();
            match column_ends.iter().position(|end| *end <= start) {
                Some(index) => {
                    column_ends[index] = event.end_time();
                    index
                }
                None => {
                    column_ends.push(event.end_time());
                    column_ends.len() - 1
                }
            }
        })
        .collect()
}

/// Lay out events in UTC with no top padding.
pub fn compute_layout<T: TimeBoxed>(
    events: &[T],
    pixels_per_hour: f64,
) -> HashMap<String, Geometry> {
    TimelineLayout::new(pixels_per_hour).layout(events, &Utc)
}
