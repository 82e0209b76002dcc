use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Unauthorized - check the model API key")]
    Unauthorized,

    #[error("Forbidden - Access denied")]
    Forbidden,

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model returned an empty completion")]
    EmptyCompletion,

    #[error("OPENAI_API_KEY is not configured")]
    MissingApiKey,

    #[error("Uploaded image is empty")]
    EmptyImage,

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

impl Error {
    /// Whether another attempt at the same outbound call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimit | Error::Timeout(_) => true,
            Error::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(Error::RateLimit.is_retryable());
        assert!(Error::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(
            Error::Status {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!Error::Unauthorized.is_retryable());
        assert!(!Error::MissingApiKey.is_retryable());
        assert!(
            !Error::Status {
                status: 400,
                body: "bad request".into()
            }
            .is_retryable()
        );
    }
}
