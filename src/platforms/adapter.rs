use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::models::{NormalizedProfile, Platform};
use crate::platforms::client::UpstreamClient;
use crate::platforms::{CodechefAdapter, CodeforcesAdapter, GitHubAdapter, LeetCodeAdapter};

/// Fetches one platform's upstream payloads concurrently and reduces them to
/// the canonical profile. Raw upstream shapes never leave the implementor.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;
    async fn fetch_and_normalize(&self, username: &str) -> Result<NormalizedProfile>;
}

pub fn adapter_for(
    platform: Platform,
    config: &Config,
    http: UpstreamClient,
) -> Box<dyn PlatformAdapter> {
    let endpoints = &config.endpoints;
    match platform {
        Platform::LeetCode => Box::new(LeetCodeAdapter::new(&endpoints.leetcode, http, config.zone)),
        Platform::GitHub => Box::new(GitHubAdapter::new(&endpoints.github, http, config.zone)),
        Platform::Codeforces => {
            Box::new(CodeforcesAdapter::new(&endpoints.codeforces, http, config.zone))
        }
        Platform::Codechef => Box::new(CodechefAdapter::new(&endpoints.codechef, http, config.zone)),
    }
}
