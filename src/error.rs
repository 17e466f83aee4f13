//! Metadata service error types.

use thiserror::Error;

/// Failure of a single metadata-service call.
///
/// These never abort a run: the resolver logs them and treats the call as
/// having returned no data.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Connection, DNS, TLS or timeout failure
    #[error("network error: {0}")]
    Transport(String),

    /// Non-success HTTP status other than rate limiting
    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },

    /// The service asked us to slow down (429 / 503)
    #[error("rate limited by metadata service (HTTP {0})")]
    RateLimited(u16),

    /// Response body was not the JSON shape we expected
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<ureq::Error> for ServiceError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(code @ (429 | 503), _) => ServiceError::RateLimited(code),
            ureq::Error::Status(code, response) => ServiceError::Status {
                code,
                message: response.status_text().to_string(),
            },
            ureq::Error::Transport(transport) => ServiceError::Transport(transport.to_string()),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::Decode(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ServiceError::Status {
            code: 404,
            message: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
        assert_eq!(
            ServiceError::RateLimited(503).to_string(),
            "rate limited by metadata service (HTTP 503)"
        );
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ServiceError = json_err.into();
        assert!(matches!(err, ServiceError::Decode(_)));
    }
}
