use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::platform::Platform;

pub const NO_NAME: &str = "No Name Available";
pub const NO_BIO: &str = "No Bio Available";
pub const NOT_AVAILABLE: &str = "Not Available";

/// Canonical profile produced by a platform adapter. Built once per fetch
/// and replaced wholesale on the next one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedProfile {
    pub platform: Platform,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub joined: Option<NaiveDate>,
    pub bio: String,
    pub headline_stats: BTreeMap<String, StatValue>,
    pub series: Vec<SeriesPoint>,
    pub heatmap: Vec<HeatmapCell>,
    pub showcase: Vec<ShowcaseItem>,
}

impl NormalizedProfile {
    pub fn last_point(&self) -> Option<&SeriesPoint> {
        self.series.last()
    }

    /// A valid profile with nothing to chart: no series points and no
    /// activity anywhere in the calendar window.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty() && self.heatmap.iter().all(|c| c.count == 0)
    }

    pub fn joined_label(&self) -> String {
        self.joined
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn stat(&self, key: &str) -> Option<&StatValue> {
        self.headline_stats.get(key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            StatValue::Number(n) => write!(f, "{:.2}", n),
            StatValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for StatValue {
    fn from(s: &str) -> Self {
        StatValue::Text(s.to_string())
    }
}

impl From<String> for StatValue {
    fn from(s: String) -> Self {
        StatValue::Text(s)
    }
}

impl From<f64> for StatValue {
    fn from(n: f64) -> Self {
        StatValue::Number(n)
    }
}

impl From<u32> for StatValue {
    fn from(n: u32) -> Self {
        StatValue::Number(n as f64)
    }
}

impl From<u64> for StatValue {
    fn from(n: u64) -> Self {
        StatValue::Number(n as f64)
    }
}

impl From<i64> for StatValue {
    fn from(n: i64) -> Self {
        StatValue::Number(n as f64)
    }
}

/// One chronological sample of a rating history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    /// Epoch seconds.
    pub timestamp: i64,
    pub rating: f64,
    pub rank: Option<u64>,
    pub title: String,
    pub year_label: String,
    pub direction: Direction,
    pub problems_solved: Option<u32>,
    pub total_problems: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Same,
}

impl Direction {
    /// Trend used for rendering: a tie counts as `Up`.
    pub fn trend(previous: f64, current: f64) -> Self {
        if current >= previous {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Strict comparison; the only path that yields `Same`.
    pub fn strict(previous: f64, current: f64) -> Self {
        if current > previous {
            Direction::Up
        } else if current < previous {
            Direction::Down
        } else {
            Direction::Same
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Same => "→",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
            Direction::Same => write!(f, "SAME"),
        }
    }
}

/// One calendar day in the activity window. Serialises `date` as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u32,
}

impl HeatmapCell {
    pub fn severity(&self) -> Severity {
        Severity::from_count(self.count)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Empty,
    Tier1,
    Tier2,
    Tier3,
    Tier4,
}

impl Severity {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => Severity::Empty,
            1..=2 => Severity::Tier1,
            3 => Severity::Tier2,
            4..=6 => Severity::Tier3,
            _ => Severity::Tier4,
        }
    }

    /// CSS class name used by calendar heatmap widgets.
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Empty => "color-empty",
            Severity::Tier1 => "color-scale-1",
            Severity::Tier2 => "color-scale-2",
            Severity::Tier3 => "color-scale-3",
            Severity::Tier4 => "color-scale-4",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Severity::Empty => '·',
            Severity::Tier1 => '░',
            Severity::Tier2 => '▒',
            Severity::Tier3 => '▓',
            Severity::Tier4 => '█',
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowcaseItem {
    pub kind: ShowcaseKind,
    pub label: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShowcaseKind {
    Organization,
    Repository,
    Badge,
}

impl std::fmt::Display for ShowcaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShowcaseKind::Organization => write!(f, "Organization"),
            ShowcaseKind::Repository => write!(f, "Repository"),
            ShowcaseKind::Badge => write!(f, "Badge"),
        }
    }
}
