use serde_json::{json, Value};
use thiserror::Error;

/// Startup and infrastructure failures (config file, data dir, socket bind).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Failures detected while serving one proxied call.
///
/// Upstream non-2xx answers are not represented here: they are passed
/// through to the caller untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Client id or secret missing. Operator-fixable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Token endpoint rejected the credentials, was unreachable, or
    /// answered with something that is not a token.
    #[error("Could not retrieve API access token: {message}")]
    UpstreamAuth {
        status: Option<u16>,
        message: String,
        body: String,
    },

    /// Inbound request is malformed (e.g. no target path).
    #[error("{0}")]
    Validation(String),

    /// Network-level failure reaching the protected API.
    #[error("Upstream request failed: {0}")]
    UpstreamCall(String),
}

impl ProxyError {
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::Validation(_) => 400,
            ProxyError::Configuration(_)
            | ProxyError::UpstreamAuth { .. }
            | ProxyError::UpstreamCall(_) => 500,
        }
    }

    /// JSON body returned to the browser. Never carries secrets or the raw
    /// token endpoint body.
    pub fn to_envelope(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ProxyError::Validation("x".into()).status_code(), 400);
        assert_eq!(ProxyError::Configuration("x".into()).status_code(), 500);
        assert_eq!(ProxyError::UpstreamCall("x".into()).status_code(), 500);
    }

    #[test]
    fn test_envelope_hides_token_endpoint_body() {
        let err = ProxyError::UpstreamAuth {
            status: Some(401),
            message: "token endpoint returned 401".into(),
            body: "{\"error\":\"invalid_client\",\"client_secret\":\"leaked\"}".into(),
        };
        let envelope = err.to_envelope().to_string();
        assert!(envelope.contains("token endpoint returned 401"));
        assert!(!envelope.contains("leaked"));
    }
}
