pub mod dates;
pub mod series;
pub mod heatmap;

pub use dates::{iso_date, rolling_window, CalendarZone};
pub use series::{axis_ticks, RatingEvent, SeriesNormalizer};
pub use heatmap::{add_count, DayCounts, HeatmapBuilder, HEATMAP_DAYS};
