use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Failure reading or writing the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("store backend error: {0}")]
    Backend(#[source] BoxError),
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Failure from the external place-search provider.
#[derive(Debug, Error)]
pub enum PlaceSearchError {
    /// The provider answered with a non-success status such as
    /// `OVER_QUERY_LIMIT` or `REQUEST_DENIED`.
    #[error("place search returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Provider {
        status: String,
        message: Option<String>,
    },

    #[error("place search transport error: {0}")]
    Transport(#[source] BoxError),
}

impl PlaceSearchError {
    /// Short machine-readable code reported to HTTP callers.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            PlaceSearchError::Provider { status, .. } => status,
            PlaceSearchError::Transport(_) => "http_error",
        }
    }
}

/// Failure handing a text message to the messaging gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway rejected message ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("gateway transport error: {0}")]
    Transport(#[source] BoxError),
}

/// Failure that aborts a whole reminder run.
///
/// Per-record problems never surface here; they are reported in the run
/// summary instead.
#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("failed to load due reminders: {0}")]
    Selection(#[source] StoreError),
}

/// Failure that aborts a nearby search.
#[derive(Debug, Error)]
pub enum NearbyError {
    #[error("failed to load registered centers: {0}")]
    RegisteredCenters(#[source] StoreError),
}
