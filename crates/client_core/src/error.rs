use thiserror::Error;

/// Failures of a single REST exchange with the goals backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request to {route} failed: {source}")]
    Transport {
        route: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{route} returned status {status}")]
    Status {
        route: String,
        status: u16,
        body: String,
    },
    #[error("unexpected response body from {route}: {source}")]
    Decode {
        route: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// The backend answered, but not with a 2xx.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
