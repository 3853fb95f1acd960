use crate::chart::ChartInteraction;
use crate::error::Result;
use crate::models::{FetchOutcome, NormalizedProfile, Platform};

/// What the view layer should currently show.
#[derive(Debug, Clone)]
pub enum View {
    Home,
    Loading {
        platform: Platform,
        username: String,
    },
    Ready {
        outcome: FetchOutcome,
        chart: ChartInteraction,
    },
    Failed(FetchOutcome),
}

/// Issued by `begin_fetch`; results are applied only while its epoch is
/// still the latest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub epoch: u64,
    pub platform: Platform,
    pub username: String,
}

/// Application context: the current username, the latest request epoch
/// and the view derived from the most recent accepted fetch.
#[derive(Debug, Clone)]
pub struct Session {
    username: Option<String>,
    epoch: u64,
    view: View,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            username: None,
            epoch: 0,
            view: View::Home,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, username: &str) {
        let trimmed = username.trim();
        self.username = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Starts a fetch cycle for the current username. `None` when no
    /// username has been entered.
    pub fn begin_fetch(&mut self, platform: Platform) -> Option<FetchTicket> {
        let username = self.username.clone()?;
        self.epoch += 1;
        tracing::info!(
            "Fetch #{} started: {} on {}",
            self.epoch,
            username,
            platform
        );
        self.view = View::Loading {
            platform,
            username: username.clone(),
        };
        Some(FetchTicket {
            epoch: self.epoch,
            platform,
            username,
        })
    }

    /// Applies a fetch result. Returns `false` and leaves the session
    /// untouched when a newer fetch has started since `ticket` was issued.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<NormalizedProfile>) -> bool {
        if ticket.epoch != self.epoch {
            tracing::warn!(
                "Discarding stale result for {} (fetch #{}, latest #{})",
                ticket.username,
                ticket.epoch,
                self.epoch
            );
            return false;
        }

        let outcome = FetchOutcome::from(result);
        self.view = match outcome.profile() {
            Some(profile) => {
                let chart = ChartInteraction::new(profile.series.clone());
                View::Ready { outcome, chart }
            }
            None => View::Failed(outcome),
        };
        true
    }

    /// Clears the username and invalidates any in-flight fetch.
    pub fn go_home(&mut self) {
        self.username = None;
        self.epoch += 1;
        self.view = View::Home;
    }

    pub fn chart(&self) -> Option<&ChartInteraction> {
        match &self.view {
            View::Ready { chart, .. } => Some(chart),
            _ => None,
        }
    }

    pub fn chart_mut(&mut self) -> Option<&mut ChartInteraction> {
        match &mut self.view {
            View::Ready { chart, .. } => Some(chart),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&FetchOutcome> {
        match &self.view {
            View::Ready { outcome, .. } | View::Failed(outcome) => Some(outcome),
            _ => None,
        }
    }
}
