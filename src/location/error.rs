use thiserror::Error;

/// Errors raised while resolving locations.
///
/// The first five variants are the caller-facing taxonomy. `Http`,
/// `UpstreamStatus` and `Decode` only come out of provider adapters;
/// [`LocationResolver`](super::LocationResolver) folds them into `BadRequest`.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    NotSupported(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

impl LocationError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::NotSupported(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// Whether this is one of the typed outcomes that callers are meant to see
    /// verbatim, as opposed to a transport-level failure.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::NotFound(_)
                | Self::ServiceUnavailable(_)
                | Self::NotSupported(_)
                | Self::BadRequest(_)
        )
    }
}

impl From<serde_json::Error> for LocationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
