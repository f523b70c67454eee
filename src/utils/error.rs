//! Error handling for the resolver chain

use thiserror::Error;

/// Errors a single resolver (or the chain as a whole) can produce
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Network failure, timeout or non-success status from an external service
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The external service answered with a body we could not make sense of
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// The external service explicitly reported that it has no media for the URL
    #[error("No media found: {0}")]
    NotFound(String),

    #[error("All resolution methods failed")]
    AllMethodsExhausted,
}

impl From<serde_json::Error> for ResolutionError {
    fn from(err: serde_json::Error) -> Self {
        ResolutionError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_message() {
        assert_eq!(
            ResolutionError::AllMethodsExhausted.to_string(),
            "All resolution methods failed"
        );
    }

    #[test]
    fn test_json_error_becomes_parse() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ResolutionError = err.into();
        assert!(matches!(err, ResolutionError::Parse(_)));
    }
}
