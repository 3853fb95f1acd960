use async_trait::async_trait;
use futures::future::{join3, try_join3};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::models::{
    NormalizedProfile, Platform, ShowcaseItem, ShowcaseKind, StatValue, NO_BIO, NO_NAME,
};
use crate::normalize::{CalendarZone, DayCounts, HeatmapBuilder, RatingEvent, SeriesNormalizer};
use crate::platforms::adapter::PlatformAdapter;
use crate::platforms::client::{endpoint, UpstreamClient};
use crate::platforms::fields::{lenient_f64, lenient_u64, non_empty};

/// Per-difficulty problem totals shown next to the solved counts.
pub const TOTAL_EASY: u32 = 871;
pub const TOTAL_MEDIUM: u32 = 1821;
pub const TOTAL_HARD: u32 = 819;

const BADGE_ICON_HOST: &str = "https://leetcode.com";

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct LcProfile {
    name: Option<String>,
    avatar: Option<String>,
    about: Option<String>,
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    ranking: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LcProblems {
    total_questions: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct LcBadges {
    #[serde(default)]
    badges: Option<Vec<LcBadge>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LcBadge {
    display_name: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LcSolved {
    solved_problem: Option<u32>,
    easy_solved: Option<u32>,
    medium_solved: Option<u32>,
    hard_solved: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LcContest {
    contest_attend: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    contest_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    contest_global_ranking: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    total_participants: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    contest_top_percentage: Option<f64>,
    #[serde(default)]
    contest_participation: Option<Vec<LcParticipation>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LcParticipation {
    #[serde(default = "attended_default")]
    attended: bool,
    rating: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    ranking: Option<u64>,
    problems_solved: Option<u32>,
    total_problems: Option<u32>,
    contest: LcContestInfo,
}

fn attended_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LcContestInfo {
    title: String,
    start_time: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LcCalendar {
    submission_calendar: Option<CalendarField>,
}

/// The calendar arrives either as a JSON object or as that object encoded
/// into a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CalendarField {
    Map(HashMap<String, u32>),
    Encoded(String),
}

impl CalendarField {
    fn into_map(self) -> Result<HashMap<String, u32>> {
        match self {
            CalendarField::Map(map) => Ok(map),
            CalendarField::Encoded(text) if text.trim().is_empty() => Ok(HashMap::new()),
            CalendarField::Encoded(text) => serde_json::from_str(&text).map_err(|e| {
                Error::ParseError(format!("submission calendar is not a JSON object: {}", e))
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Profile,
    Detail,
}

pub struct LeetCodeAdapter {
    base_url: String,
    http: UpstreamClient,
    normalizer: SeriesNormalizer,
    heatmap: HeatmapBuilder,
}

impl LeetCodeAdapter {
    pub fn new(base_url: &str, http: UpstreamClient, zone: CalendarZone) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            normalizer: SeriesNormalizer::new(zone),
            heatmap: HeatmapBuilder::new(zone),
        }
    }

    fn url(&self, segments: &[&str]) -> Result<String> {
        endpoint(&self.base_url, segments, &[])
    }

    /// Only the profile route treats a bare 404 as an unknown user; on the
    /// other routes it means the route itself is missing.
    async fn fetch<T: DeserializeOwned>(
        &self,
        username: &str,
        url: String,
        route: Route,
    ) -> Result<T> {
        tracing::debug!("Fetching {}", url);
        let payload = self.http.get(&url).await?;

        if payload.status == reqwest::StatusCode::NOT_FOUND && route == Route::Profile {
            return Err(Error::UserNotFound(username.to_string()));
        }

        let value: serde_json::Value = match payload.decode() {
            Ok(value) => value,
            Err(_) if !payload.status.is_success() => return Err(payload.upstream_error()),
            Err(e) => return Err(e),
        };

        // The API reports unknown users as a 200 carrying GraphQL errors.
        if let Some(errors) = value.get("errors").filter(|e| !e.is_null()) {
            let errors: Vec<ApiError> = serde_json::from_value(errors.clone()).unwrap_or_default();
            if errors.iter().any(|e| e.message.to_lowercase().contains("does not exist")) {
                return Err(Error::UserNotFound(username.to_string()));
            }
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::Upstream(format!("{}: {}", url, messages.join("; "))));
        }

        if !payload.status.is_success() {
            return Err(payload.upstream_error());
        }

        serde_json::from_value(value).map_err(|e| Error::ParseError(format!("{}: {}", url, e)))
    }

    fn calendar_counts(&self, calendar: Result<LcCalendar>) -> DayCounts {
        let field = match calendar {
            Ok(LcCalendar {
                submission_calendar: Some(field),
            }) => field,
            Ok(_) => return DayCounts::new(),
            Err(e) => {
                tracing::warn!("LeetCode calendar unavailable: {}", e);
                return DayCounts::new();
            }
        };

        match field.into_map() {
            Ok(map) => self
                .heatmap
                .from_epoch_keys(map.iter().map(|(k, v)| (k.as_str(), *v))),
            Err(e) => {
                tracing::warn!("LeetCode calendar unreadable: {}", e);
                DayCounts::new()
            }
        }
    }
}

#[async_trait]
impl PlatformAdapter for LeetCodeAdapter {
    fn platform(&self) -> Platform {
        Platform::LeetCode
    }

    async fn fetch_and_normalize(&self, username: &str) -> Result<NormalizedProfile> {
        tracing::info!("Fetching LeetCode profile for: {}", username);

        let required = try_join3(
            self.fetch::<LcProfile>(username, self.url(&[username])?, Route::Profile),
            self.fetch::<LcSolved>(username, self.url(&[username, "solved"])?, Route::Detail),
            self.fetch::<LcContest>(username, self.url(&[username, "contest"])?, Route::Detail),
        );
        let optional = join3(
            self.fetch::<LcProblems>(username, self.url(&["problems"])?, Route::Detail),
            self.fetch::<LcBadges>(username, self.url(&[username, "badges"])?, Route::Detail),
            self.fetch::<LcCalendar>(username, self.url(&[username, "calendar"])?, Route::Detail),
        );
        let (required, (problems, badges, calendar)) = tokio::join!(required, optional);
        let (profile, solved, contest) = required?;

        let total_questions = match problems {
            Ok(p) => p.total_questions,
            Err(e) => {
                tracing::warn!("LeetCode problem totals unavailable: {}", e);
                None
            }
        };
        let badges = match badges {
            Ok(b) => b.badges.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("LeetCode badges unavailable: {}", e);
                Vec::new()
            }
        };
        let counts = self.calendar_counts(calendar);

        let events: Vec<RatingEvent> = contest
            .contest_participation
            .unwrap_or_default()
            .into_iter()
            .filter(|p| p.attended)
            .map(|p| RatingEvent {
                timestamp: p.contest.start_time,
                rating: p.rating,
                rank: p.ranking,
                title: p.contest.title,
                problems_solved: p.problems_solved,
                total_problems: p.total_problems,
            })
            .collect();
        tracing::debug!("LeetCode: {} contests, {} active days", events.len(), counts.len());

        let mut stats: BTreeMap<String, StatValue> = BTreeMap::new();
        if let Some(ranking) = profile.ranking {
            stats.insert("Ranking".into(), ranking.into());
        }
        if let Some(country) = non_empty(profile.country) {
            stats.insert("Country".into(), country.into());
        }
        if let Some(total) = solved.solved_problem {
            let value = match total_questions {
                Some(questions) => format!("{}/{}", total, questions),
                None => total.to_string(),
            };
            stats.insert("Solved".into(), value.into());
        }
        for (label, count, total) in [
            ("Easy", solved.easy_solved, TOTAL_EASY),
            ("Medium", solved.medium_solved, TOTAL_MEDIUM),
            ("Hard", solved.hard_solved, TOTAL_HARD),
        ] {
            if let Some(count) = count {
                stats.insert(label.into(), format!("{}/{}", count, total).into());
            }
        }
        if let Some(rating) = contest.contest_rating {
            stats.insert("Contest Rating".into(), rating.round().into());
        }
        if let (Some(rank), Some(total)) = (contest.contest_global_ranking, contest.total_participants)
        {
            stats.insert("Global Ranking".into(), format!("{} / {}", rank, total).into());
        }
        if let Some(top) = contest.contest_top_percentage {
            stats.insert("Top".into(), format!("{}%", top).into());
        }
        if let Some(attended) = contest.contest_attend {
            stats.insert("Attended".into(), attended.into());
        }
        stats.insert("Badges".into(), (badges.len() as u32).into());

        let showcase = badges
            .into_iter()
            .map(|badge| ShowcaseItem {
                kind: ShowcaseKind::Badge,
                label: badge.display_name,
                url: None,
                image_url: non_empty(badge.icon).map(|icon| {
                    if icon.starts_with('/') {
                        format!("{}{}", BADGE_ICON_HOST, icon)
                    } else {
                        icon
                    }
                }),
                date: None,
            })
            .collect();

        Ok(NormalizedProfile {
            platform: Platform::LeetCode,
            username: username.to_string(),
            display_name: non_empty(profile.name).unwrap_or_else(|| NO_NAME.to_string()),
            avatar_url: non_empty(profile.avatar),
            joined: None,
            bio: non_empty(profile.about).unwrap_or_else(|| NO_BIO.to_string()),
            headline_stats: stats,
            series: self.normalizer.normalize(events),
            heatmap: self.heatmap.build_today(&counts),
            showcase,
        })
    }
}
