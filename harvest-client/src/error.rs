//! Error types for the forge client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Reasons a forge call produced no value
///
/// The exporter treats every variant as "absent" for the run being
/// processed; the variant only matters for the log line.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Contents endpoint returned something other than a base64 file
    #[error("Unsupported content: {0}")]
    UnsupportedContent(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error came from rate limiting (403 or 429)
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.status(), Some(403) | Some(429))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status() {
        let err = ClientError::api_error(404, "Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(!err.is_rate_limited());
        assert_eq!(err.to_string(), "API error (status 404): Not Found");
    }

    #[test]
    fn test_rate_limited() {
        assert!(ClientError::api_error(429, "slow down").is_rate_limited());
        assert!(ClientError::api_error(403, "limit exceeded").is_rate_limited());
        assert!(!ClientError::ParseError("bad".into()).is_rate_limited());
    }
}
