//! Error types for the pCloud API client.
//!
//! # Design
//! Failures fall into two tiers. `InvalidArgument` is raised by the request
//! builders before anything touches the network. Everything else comes back
//! from a dispatched request: the transport failed, the server answered with
//! a non-2xx status, or a checked endpoint decoded a payload whose `result`
//! code is non-zero. Most endpoints do not check `result` at all and hand the
//! decoded payload to the caller unchanged.

use thiserror::Error;

/// Errors returned by `PCloudClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required parameter was missing, empty, or combined incorrectly.
    /// No request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A checked endpoint answered with a non-zero `result` code.
    #[error("{context}: {error} (result {result})")]
    Api {
        context: String,
        result: i64,
        error: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// A request parameter could not be serialized.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A local upload source could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ApiError::InvalidArgument(msg.into())
    }

    /// True when the error was raised before any request was dispatched.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ApiError::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(
            ApiError::invalid("'fileid' or 'path' is required").to_string(),
            "invalid argument: 'fileid' or 'path' is required"
        );
        assert_eq!(
            ApiError::HttpError {
                status: 502,
                body: "bad gateway".to_string()
            }
            .to_string(),
            "HTTP 502: bad gateway"
        );
        assert_eq!(
            ApiError::Api {
                context: "userinfo".to_string(),
                result: 1000,
                error: "Log in required.".to_string()
            }
            .to_string(),
            "userinfo: Log in required. (result 1000)"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: ApiError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ApiError::Io(_)));
        assert!(!err.is_invalid_argument());
    }
}
