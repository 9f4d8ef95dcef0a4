use std::time::Duration;

use thiserror::Error;

/// Failures reported by a market data source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("failed to decode upstream document: {0}")]
    Decode(String),

    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream returned no document")]
    Empty,

    #[error("market data source has been released")]
    Closed,
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Errors produced by the universe cache and the imbalance engine.
///
/// Query operations swallow `Upstream` and `Malformed` after logging them;
/// only `InvalidInstrument` reaches callers of the imbalance query paths.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("upstream unavailable: {0}")]
    Upstream(#[from] SourceError),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("invalid instrument id {0:?}")]
    InvalidInstrument(String),
}

impl Error {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::Malformed(reason.into())
    }

    /// True for failures that mean "no value right now" rather than bad input.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Upstream(_) | Error::Malformed(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
