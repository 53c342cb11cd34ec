//! Content generator error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during generation calls
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, GeneratorError::RateLimited { .. })
    }

    /// Check if this error is worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            GeneratorError::RateLimited { .. } => true,
            GeneratorError::Api { status, .. } => *status >= 500,
            GeneratorError::Network(_) => true,
            GeneratorError::InvalidResponse(_) => false,
            GeneratorError::Json(_) => false,
        }
    }

    /// Get the retry duration if this is a rate limit error
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GeneratorError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_rate_limit() {
        let err = GeneratorError::RateLimited {
            retry_after: Duration::from_secs(60),
        };
        assert!(err.is_rate_limit());

        let err = GeneratorError::Api {
            status: 500,
            message: "server error".to_string(),
        };
        assert!(!err.is_rate_limit());
    }

    #[test]
    fn test_is_retryable() {
        assert!(
            GeneratorError::RateLimited {
                retry_after: Duration::from_secs(60)
            }
            .is_retryable()
        );

        assert!(
            GeneratorError::Api {
                status: 502,
                message: "bad gateway".to_string()
            }
            .is_retryable()
        );

        assert!(
            !GeneratorError::Api {
                status: 400,
                message: "bad request".to_string()
            }
            .is_retryable()
        );

        assert!(!GeneratorError::InvalidResponse("bad JSON".to_string()).is_retryable());
    }

    #[test]
    fn test_retry_after() {
        let err = GeneratorError::RateLimited {
            retry_after: Duration::from_secs(42),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(42)));

        let err = GeneratorError::InvalidResponse("x".to_string());
        assert_eq!(err.retry_after(), None);
    }
}
