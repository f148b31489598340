//! Error type shared by every transport and resource client.

/// Result type for catalog API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures surfaced by the gateway, with enough context to show the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Empty response from server")]
    EmptyResponse,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
