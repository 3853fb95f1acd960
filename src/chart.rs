use crate::models::SeriesPoint;
use crate::normalize::axis_ticks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    Idle,
    Hovering(usize),
}

/// Pointer hover over a rating chart, and the point the summary panel shows.
///
/// The machine owns its series; loading a different series always returns
/// it to `Idle`.
#[derive(Debug, Clone)]
pub struct ChartInteraction {
    series: Vec<SeriesPoint>,
    state: HoverState,
}

impl ChartInteraction {
    pub fn new(series: Vec<SeriesPoint>) -> Self {
        Self {
            series,
            state: HoverState::Idle,
        }
    }

    pub fn replace_series(&mut self, series: Vec<SeriesPoint>) {
        self.series = series;
        self.state = HoverState::Idle;
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    pub fn series(&self) -> &[SeriesPoint] {
        &self.series
    }

    /// Moves the hover to `index`. Indices outside the series leave the
    /// state untouched and return `false`.
    pub fn pointer_move(&mut self, index: usize) -> bool {
        if index >= self.series.len() {
            return false;
        }
        self.state = HoverState::Hovering(index);
        true
    }

    pub fn pointer_leave(&mut self) {
        self.state = HoverState::Idle;
    }

    /// The hovered point, else the latest one. `None` only for an empty
    /// series, which the panel renders as "data not available".
    pub fn current_data(&self) -> Option<&SeriesPoint> {
        match self.state {
            HoverState::Hovering(i) => self.series.get(i),
            HoverState::Idle => self.series.last(),
        }
    }

    /// The point drawn with the end-of-series marker.
    pub fn last_index(&self) -> Option<usize> {
        self.series.len().checked_sub(1)
    }

    pub fn axis_ticks(&self) -> Option<[String; 2]> {
        axis_ticks(&self.series)
    }
}
