use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failure kinds reported by external price sources.
///
/// Adapters translate transport and decode failures into these kinds; the
/// pricing pipeline never sees a raw `reqwest::Error`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    #[error("not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,

    #[error("source unavailable")]
    Unavailable,

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("malformed response")]
    MalformedResponse,
}

impl SourceError {
    /// Map an HTTP status code to a failure kind.
    ///
    /// Returns `None` for success statuses.
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode) -> Option<Self> {
        if status.is_success() {
            None
        } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Some(Self::RateLimited)
        } else if status.is_client_error() {
            Some(Self::NotFound)
        } else {
            Some(Self::Unavailable)
        }
    }

    /// Map a transport error to a failure kind.
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedResponse
        } else if let Some(kind) = err.status().and_then(Self::from_status) {
            kind
        } else {
            Self::Unavailable
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("price source error: {0}")]
    Source(#[from] SourceError),

    #[error("price lookup cancelled")]
    Cancelled,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
