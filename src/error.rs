use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// User-visible failure classes. Anything that is not an explicit
/// "does not exist" from upstream is reported as data not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Upstream,
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::UserNotFound(_) => FailureKind::NotFound,
            _ => FailureKind::Upstream,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == FailureKind::NotFound
    }
}
