use std::time::Duration;
use thiserror::Error;

/// Failure of a single gateway call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{code}: {message}")]
    Service { code: String, message: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("queue {0} has no redrive policy configured")]
    NoRedrivePolicy(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl GatewayError {
    /// Build a service error from an AWS JSON error body.
    ///
    /// `__type` comes either bare (`QueueDoesNotExist`) or namespaced
    /// (`com.amazonaws.sqs#QueueDoesNotExist`); only the short code is kept.
    pub fn service(error_type: &str, message: impl Into<String>) -> Self {
        let code = error_type.rsplit('#').next().unwrap_or(error_type).to_string();
        Self::Service {
            code,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            GatewayError::Transport(format!("request timed out: {error}"))
        } else if error.is_decode() {
            GatewayError::Decode(error.to_string())
        } else {
            GatewayError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(error: serde_json::Error) -> Self {
        GatewayError::Decode(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_strips_namespace() {
        let error = GatewayError::service("com.amazonaws.sqs#QueueDoesNotExist", "no such queue");
        assert_eq!(error.to_string(), "QueueDoesNotExist: no such queue");
    }

    #[test]
    fn test_timeout_message() {
        let error = GatewayError::Timeout(Duration::from_secs(10));
        assert!(error.is_timeout());
        assert_eq!(error.to_string(), "request timed out after 10s");
    }
}
