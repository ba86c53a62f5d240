//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote job failed: {0}")]
    RemoteJob(String),

    #[error("Timed out waiting for job completion after {0} attempts")]
    Timeout(u32),

    #[error("Job succeeded but returned no output")]
    EmptyResult,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Whether this failure should advance the fallback chain to the next
    /// strategy. Validation errors short-circuit the whole chain and an
    /// empty result is surfaced as-is rather than papered over.
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::RemoteJob(_) | Error::Timeout(_) | Error::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_and_job_errors_advance_the_chain() {
        assert!(Error::Transport("connection refused".to_string()).is_fallback_eligible());
        assert!(Error::RemoteJob("NSFW content detected".to_string()).is_fallback_eligible());
        assert!(Error::Timeout(30).is_fallback_eligible());
    }

    #[test]
    fn test_validation_and_empty_result_do_not_advance() {
        assert!(!Error::Validation("bad model ref".to_string()).is_fallback_eligible());
        assert!(!Error::EmptyResult.is_fallback_eligible());
    }
}
