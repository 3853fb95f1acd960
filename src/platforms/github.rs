use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join;
use reqwest::{header, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::{
    NormalizedProfile, Platform, ShowcaseItem, ShowcaseKind, StatValue, NO_BIO, NO_NAME,
};
use crate::normalize::{CalendarZone, HeatmapBuilder};
use crate::platforms::adapter::PlatformAdapter;
use crate::platforms::client::{endpoint, UpstreamClient};
use crate::platforms::fields::non_empty;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct GhUser {
    name: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
    created_at: Option<DateTime<Utc>>,
    followers: Option<u32>,
    following: Option<u32>,
    public_repos: Option<u32>,
    organizations_url: String,
    repos_url: String,
}

#[derive(Debug, Deserialize)]
struct GhOrganization {
    login: String,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GhRepository {
    name: String,
    created_at: Option<DateTime<Utc>>,
    html_url: Option<String>,
}

pub struct GitHubAdapter {
    base_url: String,
    http: UpstreamClient,
    zone: CalendarZone,
    heatmap: HeatmapBuilder,
}

impl GitHubAdapter {
    pub fn new(base_url: &str, http: UpstreamClient, zone: CalendarZone) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            zone,
            heatmap: HeatmapBuilder::new(zone),
        }
    }

    fn request(&self, url: &str) -> RequestBuilder {
        self.http
            .client()
            .get(url)
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("Fetching {}", url);
        let payload = self.http.send(self.request(url)).await?;

        if !payload.status.is_success() {
            return Err(payload.upstream_error());
        }
        payload.decode()
    }

    async fn get_user(&self, username: &str) -> Result<GhUser> {
        let url = endpoint(&self.base_url, &["users", username], &[])?;
        tracing::info!("Fetching GitHub user: {}", username);

        let payload = self.http.send(self.request(&url)).await?;

        if payload.status == StatusCode::NOT_FOUND {
            return Err(Error::UserNotFound(username.to_string()));
        }
        if !payload.status.is_success() {
            return Err(payload.upstream_error());
        }

        // Some proxies answer 200 with the "Not Found" message body.
        let value: serde_json::Value = payload.decode()?;
        if value.get("message").and_then(|m| m.as_str()) == Some("Not Found") {
            return Err(Error::UserNotFound(username.to_string()));
        }

        serde_json::from_value(value).map_err(|e| Error::ParseError(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl PlatformAdapter for GitHubAdapter {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    async fn fetch_and_normalize(&self, username: &str) -> Result<NormalizedProfile> {
        let user = self.get_user(username).await?;

        // The follow-up URLs come from the profile itself.
        let (organizations, repositories) = try_join(
            self.fetch::<Vec<GhOrganization>>(&user.organizations_url),
            self.fetch::<Vec<GhRepository>>(&user.repos_url),
        )
        .await?;
        tracing::debug!(
            "GitHub: {} organizations, {} repositories",
            organizations.len(),
            repositories.len()
        );

        let counts = self.heatmap.count_events(
            repositories
                .iter()
                .filter_map(|r| r.created_at)
                .map(|created| created.timestamp()),
        );

        let mut stats: BTreeMap<String, StatValue> = BTreeMap::new();
        if let Some(followers) = user.followers {
            stats.insert("Followers".into(), followers.into());
        }
        if let Some(following) = user.following {
            stats.insert("Following".into(), following.into());
        }
        if let Some(public_repos) = user.public_repos {
            stats.insert("Public Repos".into(), public_repos.into());
        }
        stats.insert("Organizations".into(), (organizations.len() as u32).into());

        let showcase = organizations
            .into_iter()
            .map(|org| ShowcaseItem {
                kind: ShowcaseKind::Organization,
                label: org.login,
                url: None,
                image_url: non_empty(org.avatar_url),
                date: None,
            })
            .chain(repositories.into_iter().map(|repo| ShowcaseItem {
                kind: ShowcaseKind::Repository,
                label: repo.name,
                url: non_empty(repo.html_url),
                image_url: None,
                date: repo.created_at.map(|c| self.zone.truncate_to_day(c)),
            }))
            .collect();

        Ok(NormalizedProfile {
            platform: Platform::GitHub,
            username: username.to_string(),
            display_name: non_empty(user.name).unwrap_or_else(|| NO_NAME.to_string()),
            avatar_url: non_empty(user.avatar_url),
            joined: user.created_at.map(|c| self.zone.truncate_to_day(c)),
            bio: non_empty(user.bio).unwrap_or_else(|| NO_BIO.to_string()),
            headline_stats: stats,
            series: Vec::new(),
            heatmap: self.heatmap.build_today(&counts),
            showcase,
        })
    }
}
