use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::{NormalizedProfile, Platform, StatValue, NO_BIO, NO_NAME};
use crate::normalize::{
    add_count, CalendarZone, DayCounts, HeatmapBuilder, RatingEvent, SeriesNormalizer,
};
use crate::platforms::adapter::PlatformAdapter;
use crate::platforms::client::{endpoint, UpstreamClient};
use crate::platforms::fields::{lenient_f64, lenient_u64, non_empty};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CcProfile {
    success: Option<bool>,
    profile: Option<String>,
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    current_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    highest_rating: Option<f64>,
    country_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    global_rank: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    country_rank: Option<u64>,
    stars: Option<String>,
    #[serde(default)]
    heat_map: Option<Vec<CcHeatDay>>,
    #[serde(default)]
    rating_data: Option<Vec<CcRating>>,
}

#[derive(Debug, Deserialize)]
struct CcHeatDay {
    date: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    value: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CcRating {
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    rank: Option<u64>,
    name: Option<String>,
    end_date: Option<String>,
}

pub struct CodechefAdapter {
    base_url: String,
    http: UpstreamClient,
    zone: CalendarZone,
    normalizer: SeriesNormalizer,
    heatmap: HeatmapBuilder,
}

impl CodechefAdapter {
    pub fn new(base_url: &str, http: UpstreamClient, zone: CalendarZone) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            zone,
            normalizer: SeriesNormalizer::new(zone),
            heatmap: HeatmapBuilder::new(zone),
        }
    }

    fn rating_events(&self, ratings: Vec<CcRating>) -> Vec<RatingEvent> {
        ratings
            .into_iter()
            .filter_map(|entry| {
                let end_date = non_empty(entry.end_date)?;
                let Some(timestamp) = parse_day_or_datetime(&end_date)
                    .and_then(|naive| self.zone.local_to_epoch(naive))
                else {
                    tracing::warn!("Skipping CodeChef contest with end_date {:?}", end_date);
                    return None;
                };
                let Some(rating) = entry.rating else {
                    tracing::warn!("Skipping CodeChef contest without rating at {}", end_date);
                    return None;
                };
                Some(
                    RatingEvent::new(timestamp, rating, entry.name.unwrap_or_default())
                        .with_rank(entry.rank),
                )
            })
            .collect()
    }
}

#[async_trait]
impl PlatformAdapter for CodechefAdapter {
    fn platform(&self) -> Platform {
        Platform::Codechef
    }

    async fn fetch_and_normalize(&self, username: &str) -> Result<NormalizedProfile> {
        tracing::info!("Fetching CodeChef profile for: {}", username);
        let url = endpoint(&self.base_url, &[username], &[])?;
        let payload = self.http.get(&url).await?;

        if payload.status == StatusCode::NOT_FOUND {
            return Err(Error::UserNotFound(username.to_string()));
        }
        if !payload.status.is_success() {
            return Err(payload.upstream_error());
        }

        let profile: CcProfile = payload.decode()?;
        if profile.success == Some(false) {
            return Err(Error::UserNotFound(username.to_string()));
        }

        let heat_days = profile.heat_map.unwrap_or_default();
        let joined = heat_days.first().and_then(|d| parse_day(&d.date));

        let counts = heat_counts(&heat_days);
        if counts.is_empty() {
            tracing::debug!("CodeChef reported no activity for {}", username);
        }

        let events = self.rating_events(profile.rating_data.unwrap_or_default());

        let mut stats: BTreeMap<String, StatValue> = BTreeMap::new();
        if let Some(stars) = non_empty(profile.stars.clone()) {
            stats.insert("Stars".into(), stars.into());
        }
        if let Some(rating) = profile.current_rating {
            stats.insert("Current Rating".into(), rating.into());
        }
        if let Some(rating) = profile.highest_rating {
            stats.insert("Highest Rating".into(), rating.into());
        }
        if let Some(rank) = profile.global_rank {
            stats.insert("Global Rank".into(), rank.into());
        }
        if let Some(rank) = profile.country_rank {
            stats.insert("Country Rank".into(), rank.into());
        }
        if let Some(country) = non_empty(profile.country_name.clone()) {
            stats.insert("Country".into(), country.into());
        }
        stats.insert("Attended".into(), (events.len() as u32).into());

        let bio = match (non_empty(profile.stars), non_empty(profile.country_name)) {
            (Some(stars), Some(country)) => format!("{} Coder from {}", stars, country),
            (Some(stars), None) => format!("{} Coder", stars),
            (None, Some(country)) => format!("Coder from {}", country),
            (None, None) => NO_BIO.to_string(),
        };

        Ok(NormalizedProfile {
            platform: Platform::Codechef,
            username: username.to_string(),
            display_name: non_empty(profile.name).unwrap_or_else(|| NO_NAME.to_string()),
            avatar_url: non_empty(profile.profile),
            joined,
            bio,
            headline_stats: stats,
            series: self.normalizer.normalize(events),
            heatmap: self.heatmap.build_today(&counts),
            showcase: Vec::new(),
        })
    }
}

fn heat_counts(days: &[CcHeatDay]) -> DayCounts {
    let mut counts = DayCounts::new();
    for day in days {
        if let (Some(date), Some(value)) = (parse_day(&day.date), day.value) {
            add_count(&mut counts, date, u32::try_from(value).unwrap_or(u32::MAX));
        }
    }
    counts
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Contest end dates are local wall-clock `YYYY-MM-DD HH:MM:SS`; a bare
/// date is read as midnight.
fn parse_day_or_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| parse_day(value).and_then(|d| d.and_hms_opt(0, 0, 0)))
}
