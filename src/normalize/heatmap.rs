use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::HeatmapCell;
use crate::normalize::dates::{rolling_window, CalendarZone};

/// Length of the activity calendar, inclusive of the end date.
pub const HEATMAP_DAYS: usize = 365;

/// Sparse day -> count map, the shape every platform is reduced to.
pub type DayCounts = BTreeMap<NaiveDate, u32>;

pub struct HeatmapBuilder {
    zone: CalendarZone,
}

impl HeatmapBuilder {
    pub fn new(zone: CalendarZone) -> Self {
        Self { zone }
    }

    /// Dense calendar ending today in the builder's zone.
    pub fn build_today(&self, counts: &DayCounts) -> Vec<HeatmapCell> {
        build(counts, self.zone.today())
    }

    /// Counts one event per timestamp, bucketed by calendar day.
    pub fn count_events<I>(&self, timestamps: I) -> DayCounts
    where
        I: IntoIterator<Item = i64>,
    {
        let mut counts = DayCounts::new();
        for secs in timestamps {
            match self.zone.day_of_epoch(secs) {
                Some(day) => add_count(&mut counts, day, 1),
                None => tracing::debug!("Skipping out-of-range timestamp {}", secs),
            }
        }
        counts
    }

    /// Re-buckets a map keyed by epoch-seconds strings. Keys that land on the
    /// same calendar day are summed; unparseable keys are dropped.
    pub fn from_epoch_keys<'a, I>(&self, entries: I) -> DayCounts
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut counts = DayCounts::new();
        for (key, count) in entries {
            let day = key
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|secs| self.zone.day_of_epoch(secs));
            match day {
                Some(day) => add_count(&mut counts, day, count),
                None => tracing::debug!("Skipping calendar key {:?}", key),
            }
        }
        counts
    }
}

/// Dense `HEATMAP_DAYS`-long calendar ending at `end`. Dates absent from
/// `counts` get zero; dates outside the window are ignored.
/// Adds `count` to `day`, saturating at `u32::MAX`.
pub fn add_count(counts: &mut DayCounts, day: NaiveDate, count: u32) {
    let total = counts.entry(day).or_insert(0);
    *total = total.saturating_add(count);
}

pub fn build(counts: &DayCounts, end: NaiveDate) -> Vec<HeatmapCell> {
    rolling_window(end, HEATMAP_DAYS)
        .into_iter()
        .map(|date| HeatmapCell {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}
