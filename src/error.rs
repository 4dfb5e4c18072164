//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("S3/CDN error: {0}")]
    S3(String),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Story not found")]
    NotFound,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Any failure inside the generation chain. Carries the cause's message verbatim.
    #[error("{0}")]
    GenerationFailed(String),
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::StorageUnavailable(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Error::StorageUnavailable(e.to_string())
    }
}

impl Error {
    /// Collapse any error into [`Error::GenerationFailed`], keeping the cause text.
    pub fn into_generation_failure(self) -> Self {
        match self {
            Error::GenerationFailed(_) => self,
            other => Error::GenerationFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failure_keeps_cause_text() {
        let err = Error::AiProvider("quota exceeded".to_string()).into_generation_failure();
        assert!(matches!(err, Error::GenerationFailed(_)));
        assert_eq!(err.to_string(), "AI provider error: quota exceeded");
    }

    #[test]
    fn test_generation_failure_is_not_double_wrapped() {
        let err = Error::GenerationFailed("boom".to_string()).into_generation_failure();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_sqlx_error_maps_to_storage_unavailable() {
        let err: Error = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, Error::StorageUnavailable(_)));
    }
}
