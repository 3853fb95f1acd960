use serde::Serialize;

use super::profile::NormalizedProfile;
use crate::error::{Error, FailureKind};

/// What the rendering layer branches on after a fetch cycle.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum FetchOutcome {
    Loaded(NormalizedProfile),
    /// Valid response with zero data points; rendered as an empty chart
    /// and calendar, not as an error.
    Empty(NormalizedProfile),
    NotFound(String),
    Unavailable(String),
}

impl FetchOutcome {
    pub fn profile(&self) -> Option<&NormalizedProfile> {
        match self {
            FetchOutcome::Loaded(p) | FetchOutcome::Empty(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FetchOutcome::NotFound(_) | FetchOutcome::Unavailable(_))
    }
}

impl From<Result<NormalizedProfile, Error>> for FetchOutcome {
    fn from(result: Result<NormalizedProfile, Error>) -> Self {
        match result {
            Ok(profile) if profile.is_empty() => FetchOutcome::Empty(profile),
            Ok(profile) => FetchOutcome::Loaded(profile),
            Err(e) => match e.kind() {
                FailureKind::NotFound => FetchOutcome::NotFound(e.to_string()),
                FailureKind::Upstream => FetchOutcome::Unavailable(e.to_string()),
            },
        }
    }
}
