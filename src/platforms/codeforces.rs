use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::try_join3;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::{NormalizedProfile, Platform, StatValue, NO_BIO, NO_NAME};
use crate::normalize::{CalendarZone, HeatmapBuilder, RatingEvent, SeriesNormalizer};
use crate::platforms::adapter::PlatformAdapter;
use crate::platforms::client::{endpoint, UpstreamClient};
use crate::platforms::fields::non_empty;

/// Every Codeforces method wraps its result in `{status, comment, result}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    comment: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfUser {
    first_name: Option<String>,
    last_name: Option<String>,
    country: Option<String>,
    organization: Option<String>,
    rank: Option<String>,
    rating: Option<i64>,
    max_rank: Option<String>,
    max_rating: Option<i64>,
    registration_time_seconds: Option<i64>,
    title_photo: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfRatingChange {
    contest_name: String,
    rank: Option<u64>,
    rating_update_time_seconds: i64,
    new_rating: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfSubmission {
    creation_time_seconds: i64,
}

pub struct CodeforcesAdapter {
    base_url: String,
    http: UpstreamClient,
    zone: CalendarZone,
    normalizer: SeriesNormalizer,
    heatmap: HeatmapBuilder,
}

impl CodeforcesAdapter {
    pub fn new(base_url: &str, http: UpstreamClient, zone: CalendarZone) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            zone,
            normalizer: SeriesNormalizer::new(zone),
            heatmap: HeatmapBuilder::new(zone),
        }
    }

    /// Calls one API method. Failed calls come back as HTTP 400 with a
    /// `FAILED` envelope, so the body is decoded before the status is judged.
    async fn call<T: DeserializeOwned>(&self, username: &str, url: String) -> Result<T> {
        tracing::debug!("Fetching {}", url);
        let payload = self.http.get(&url).await?;

        let envelope: Envelope<T> = match payload.decode() {
            Ok(envelope) => envelope,
            Err(_) if !payload.status.is_success() => return Err(payload.upstream_error()),
            Err(e) => return Err(e),
        };

        if envelope.status != "OK" {
            let comment = envelope.comment.unwrap_or_default();
            if comment.to_lowercase().contains("not found") {
                return Err(Error::UserNotFound(username.to_string()));
            }
            return Err(Error::Upstream(format!("{}: {} {}", url, envelope.status, comment)));
        }

        envelope
            .result
            .ok_or_else(|| Error::ParseError(format!("{}: OK response without result", url)))
    }
}

#[async_trait]
impl PlatformAdapter for CodeforcesAdapter {
    fn platform(&self) -> Platform {
        Platform::Codeforces
    }

    async fn fetch_and_normalize(&self, username: &str) -> Result<NormalizedProfile> {
        tracing::info!("Fetching Codeforces profile for: {}", username);

        let info_url = endpoint(&self.base_url, &["user.info"], &[("handles", username)])?;
        let rating_url = endpoint(&self.base_url, &["user.rating"], &[("handle", username)])?;
        let status_url = endpoint(&self.base_url, &["user.status"], &[("handle", username)])?;

        let (users, changes, submissions) = try_join3(
            self.call::<Vec<CfUser>>(username, info_url),
            self.call::<Vec<CfRatingChange>>(username, rating_url),
            self.call::<Vec<CfSubmission>>(username, status_url),
        )
        .await?;

        let user = users
            .into_iter()
            .next()
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;
        tracing::debug!(
            "Codeforces: {} rating changes, {} submissions",
            changes.len(),
            submissions.len()
        );

        let events: Vec<RatingEvent> = changes
            .into_iter()
            .map(|c| {
                RatingEvent::new(c.rating_update_time_seconds, c.new_rating, c.contest_name)
                    .with_rank(c.rank)
            })
            .collect();
        let contests = events.len() as u32;

        let counts = self
            .heatmap
            .count_events(submissions.iter().map(|s| s.creation_time_seconds));

        let mut stats: BTreeMap<String, StatValue> = BTreeMap::new();
        if let Some(max_rating) = user.max_rating {
            stats.insert("Max Rating".into(), max_rating.into());
        }
        if let Some(max_rank) = non_empty(user.max_rank.clone()) {
            stats.insert("Max Rank".into(), capitalize(&max_rank).into());
        }
        if let Some(rating) = user.rating {
            stats.insert("Rating".into(), rating.into());
        }
        if let Some(rank) = non_empty(user.rank.clone()) {
            stats.insert("Rank".into(), capitalize(&rank).into());
        }
        if let Some(country) = non_empty(user.country.clone()) {
            stats.insert("Country".into(), country.into());
        }
        if let Some(organization) = non_empty(user.organization.clone()) {
            stats.insert("Organization".into(), organization.into());
        }
        stats.insert("Attended".into(), contests.into());

        let joined: Option<NaiveDate> = user
            .registration_time_seconds
            .and_then(|secs| self.zone.day_of_epoch(secs));

        Ok(NormalizedProfile {
            platform: Platform::Codeforces,
            username: username.to_string(),
            display_name: full_name(&user).unwrap_or_else(|| NO_NAME.to_string()),
            avatar_url: non_empty(user.title_photo.clone()).map(absolute_photo_url),
            joined,
            bio: bio(&user),
            headline_stats: stats,
            series: self.normalizer.normalize(events),
            heatmap: self.heatmap.build_today(&counts),
            showcase: Vec::new(),
        })
    }
}

fn full_name(user: &CfUser) -> Option<String> {
    let parts: Vec<String> = [user.first_name.clone(), user.last_name.clone()]
        .into_iter()
        .filter_map(non_empty)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn bio(user: &CfUser) -> String {
    let country = non_empty(user.country.clone());
    let organization = non_empty(user.organization.clone());
    if country.is_none() && organization.is_none() && user.max_rank.is_none() {
        return NO_BIO.to_string();
    }

    let max_rank = non_empty(user.max_rank.clone())
        .map(|r| capitalize(&r))
        .unwrap_or_else(|| "Unknown".to_string());
    let mut bio = format!("{} coder", max_rank);
    if let Some(country) = country {
        bio.push_str(&format!(" from {}", country));
    }
    if let Some(organization) = organization {
        bio.push_str(&format!(" || Studying at {}", organization));
    }
    bio
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Older API responses use protocol-relative photo URLs.
fn absolute_photo_url(url: String) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url
    }
}
