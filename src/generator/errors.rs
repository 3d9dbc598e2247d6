//! Generator errors
//!
//! Every variant means "generative backend unavailable"; callers recover
//! by falling back to the rule engine.

use thiserror::Error;

/// Result type for generative backend operations
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Generative backend errors
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("OPENAI_API_KEY not set")]
    MissingCredentials,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response carried no message content")]
    EmptyResponse,

    #[error("response is not a JSON array of test cases: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            GenerationError::MissingCredentials.to_string(),
            "OPENAI_API_KEY not set"
        );
        let err = GenerationError::Status {
            status: 401,
            body: "invalid key".to_string(),
        };
        assert_eq!(err.to_string(), "backend returned HTTP 401: invalid key");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: GenerationError = json_err.into();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }
}
