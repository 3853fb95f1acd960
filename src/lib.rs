pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod platforms;
pub mod chart;
pub mod session;

pub use config::{Config, Endpoints};
pub use error::{Error, FailureKind, Result};
pub use chart::{ChartInteraction, HoverState};
pub use models::{FetchOutcome, NormalizedProfile, Platform};
pub use platforms::{adapter_for, PlatformAdapter, UpstreamClient};
pub use session::{FetchTicket, Session, View};
