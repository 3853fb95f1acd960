use crate::models::{Direction, SeriesPoint};
use crate::normalize::dates::CalendarZone;

/// A rating event with platform field names already resolved by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingEvent {
    pub timestamp: i64,
    pub rating: f64,
    pub rank: Option<u64>,
    pub title: String,
    pub problems_solved: Option<u32>,
    pub total_problems: Option<u32>,
}

impl RatingEvent {
    pub fn new(timestamp: i64, rating: f64, title: impl Into<String>) -> Self {
        Self {
            timestamp,
            rating,
            rank: None,
            title: title.into(),
            problems_solved: None,
            total_problems: None,
        }
    }

    pub fn with_rank(mut self, rank: Option<u64>) -> Self {
        self.rank = rank;
        self
    }
}

pub struct SeriesNormalizer {
    zone: CalendarZone,
}

impl SeriesNormalizer {
    pub fn new(zone: CalendarZone) -> Self {
        Self { zone }
    }

    /// Input order is taken as chronological order. Events are never
    /// re-sorted or deduplicated, so out-of-order upstream data yields
    /// out-of-order directions and year labels.
    pub fn normalize(&self, events: Vec<RatingEvent>) -> Vec<SeriesPoint> {
        let mut previous: Option<f64> = None;

        events
            .into_iter()
            .map(|event| {
                let direction = Direction::trend(previous.unwrap_or(event.rating), event.rating);
                previous = Some(event.rating);

                let year_label = self.zone.year_label(event.timestamp).unwrap_or_else(|| {
                    tracing::warn!("Timestamp out of range: {}", event.timestamp);
                    String::new()
                });

                SeriesPoint {
                    timestamp: event.timestamp,
                    rating: event.rating,
                    rank: event.rank,
                    title: event.title,
                    year_label,
                    direction,
                    problems_solved: event.problems_solved,
                    total_problems: event.total_problems,
                }
            })
            .collect()
    }
}

/// The chart's two x-axis ticks: the first and last points' years.
/// Duplicates are kept when the series spans a single year.
pub fn axis_ticks(series: &[SeriesPoint]) -> Option<[String; 2]> {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => Some([first.year_label.clone(), last.year_label.clone()]),
        _ => None,
    }
}
