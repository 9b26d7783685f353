#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Body of a dedicated image upload response
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageUploadResponse {
    pub url: String,
}

/// Plain acknowledgement, e.g. the logout response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageResponse {
    #[cfg_attr(feature = "serde", serde(default))]
    pub message: String,
}

/// Error envelope returned with non-2xx statuses.
///
/// Backends populate either `error`, `message`, or both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErrorResponse {
    #[cfg_attr(feature = "serde", serde(default))]
    pub error: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Most specific human readable text in the envelope
    pub fn detail(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.error.as_deref().filter(|e| !e.trim().is_empty()))
    }
}
