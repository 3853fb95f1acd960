use crate::error::{Error, Result};
use crate::normalize::CalendarZone;
use chrono::{FixedOffset, Offset, Utc};
use std::env;

pub const DEFAULT_LEETCODE_API_URL: &str = "https://alfa-leetcode-api.onrender.com";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_CODEFORCES_API_URL: &str = "https://codeforces.com/api";
pub const DEFAULT_CODECHEF_API_URL: &str = "https://codechef-api.vercel.app/handle";

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoints: Endpoints,
    pub request_timeout_secs: u64,
    pub zone: CalendarZone,
}

/// Base URLs of the four upstream APIs, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub leetcode: String,
    pub github: String,
    pub codeforces: String,
    pub codechef: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            leetcode: DEFAULT_LEETCODE_API_URL.to_string(),
            github: DEFAULT_GITHUB_API_URL.to_string(),
            codeforces: DEFAULT_CODEFORCES_API_URL.to_string(),
            codechef: DEFAULT_CODECHEF_API_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Points every platform at the same base URL. Used against mock servers.
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            leetcode: base.clone(),
            github: base.clone(),
            codeforces: base.clone(),
            codechef: base,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            request_timeout_secs: 30,
            zone: CalendarZone::Local,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let url = |key: &str, default: &str| {
            env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| default.to_string())
        };

        let endpoints = Endpoints {
            leetcode: url("LEETCODE_API_URL", DEFAULT_LEETCODE_API_URL),
            github: url("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            codeforces: url("CODEFORCES_API_URL", DEFAULT_CODEFORCES_API_URL),
            codechef: url("CODECHEF_API_URL", DEFAULT_CODECHEF_API_URL),
        };

        let request_timeout_secs = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(v) => v.trim().parse().map_err(|_| {
                Error::Config(format!("REQUEST_TIMEOUT_SECS is not a number: {}", v))
            })?,
            Err(_) => 30,
        };

        let zone = match env::var("PROFILE_UTC_OFFSET") {
            Ok(v) => CalendarZone::Fixed(parse_utc_offset(&v)?),
            Err(_) => CalendarZone::Local,
        };

        Ok(Self {
            endpoints,
            request_timeout_secs,
            zone,
        })
    }
}

/// Parses offsets of the form `+05:30`, `-08:00`, `+0200` or `Z`.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset> {
    let value = value.trim();

    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    value
        .parse::<FixedOffset>()
        .map_err(|e| Error::Config(format!("invalid PROFILE_UTC_OFFSET {:?}: {}", value, e)))
}
