/// Error types for calls against the task API
use thiserror::Error;

/// Failures of a single API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Server returned {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },

    /// The response body was not the expected JSON shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The configured base URL cannot be used
    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Short text for a non-blocking notice shown to the person at the keyboard.
    pub fn notice(&self) -> String {
        match self {
            ApiError::Network(_) => "Network error: the task server could not be reached.".to_string(),
            ApiError::Status { status, .. } => format!("The task server rejected the request (HTTP {}).", status),
            ApiError::Parse(_) => "The task server sent a response that could not be read.".to_string(),
            ApiError::InvalidUrl(url) => format!("The task server address '{}' is not valid.", url),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Parse(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
