//! Profile API error types
//!
//! One taxonomy for every call the page makes. The enum is `Clone` so it
//! can ride inside UI messages unchanged.

use profile_model::ErrorResponse;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileApiError {
    /// No response was received (connect failure, timeout, broken body)
    #[error("Network error: {0}")]
    Network(String),

    /// Missing or expired session
    #[error("Not authenticated: {0}")]
    Auth(String),

    /// The backend rejected a field value
    #[error("{0}")]
    Validation(String),

    /// Any other non-2xx response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A 2xx response whose body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Result type alias for profile API operations
pub type ApiResult<T> = Result<T, ProfileApiError>;

impl ProfileApiError {
    /// Classify a non-2xx response from its status and raw body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|envelope| envelope.detail().map(str::to_string))
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProfileApiError::Auth(detail)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ProfileApiError::Validation(detail)
            }
            other => ProfileApiError::Server {
                status: other.as_u16(),
                message: detail,
            },
        }
    }

    /// Classify a failed read. No field values were submitted, so a
    /// 400/422 is reported as a server fault rather than a rejected value.
    pub fn from_read_status(status: StatusCode, body: &str) -> Self {
        match Self::from_status(status, body) {
            ProfileApiError::Validation(message) => ProfileApiError::Server {
                status: status.as_u16(),
                message,
            },
            other => other,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ProfileApiError::Auth(_))
    }

    /// Short text suitable for an inline error line
    pub fn user_message(&self) -> String {
        match self {
            ProfileApiError::Network(_) => {
                "Could not reach the server. Check your connection and try again."
                    .to_string()
            }
            ProfileApiError::Auth(_) => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ProfileApiError::Validation(message) => message.clone(),
            ProfileApiError::Server { message, .. } => message.clone(),
            ProfileApiError::Decode(_) => {
                "The server sent an unexpected response.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ProfileApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProfileApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ProfileApiError::from_status(status, "")
        } else {
            ProfileApiError::Network(err.to_string())
        }
    }
}
