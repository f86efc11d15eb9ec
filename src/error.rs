//! Error types for Data API operations.

use serde_json::Value as JsonValue;
use thiserror::Error;

/// All errors that can occur while building or dispatching a request.
#[derive(Debug, Error)]
pub enum MongoError {
    /// Missing or invalid client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An operation was invoked without a database and collection.
    #[error("scope error: {0}")]
    Scope(String),

    /// Network failure or unreadable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The transport gave up waiting for a response.
    #[error("operation timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("remote operation failed with status {status}: {body}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Error body returned by the endpoint.
        body: JsonValue,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl MongoError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        MongoError::Configuration(msg.into())
    }

    /// Create a scope error.
    pub fn scope(msg: impl Into<String>) -> Self {
        MongoError::Scope(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        MongoError::Transport(msg.into())
    }

    /// Create a remote operation error.
    pub fn remote(status: u16, body: JsonValue) -> Self {
        MongoError::Remote { status, body }
    }

    /// Check if this error came from the network layer.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, MongoError::Transport(_) | MongoError::Timeout)
    }

    /// Check if the endpoint rejected the operation.
    pub fn is_remote_error(&self) -> bool {
        matches!(self, MongoError::Remote { .. })
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, MongoError::Timeout)
    }

    /// Get the HTTP status if the endpoint returned one.
    pub fn status(&self) -> Option<u16> {
        match self {
            MongoError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<serde_json::Error> for MongoError {
    fn from(err: serde_json::Error) -> Self {
        MongoError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for MongoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MongoError::Timeout
        } else {
            MongoError::Transport(err.to_string())
        }
    }
}

/// Result type alias for Data API operations.
pub type Result<T> = std::result::Result<T, MongoError>;

/// Error kind enumeration for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error.
    Configuration,
    /// Scope error.
    Scope,
    /// Transport or timeout error.
    Transport,
    /// Remote operation error.
    Remote,
    /// Serialization error.
    Serialization,
}

impl MongoError {
    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MongoError::Configuration(_) => ErrorKind::Configuration,
            MongoError::Scope(_) => ErrorKind::Scope,
            MongoError::Transport(_) | MongoError::Timeout => ErrorKind::Transport,
            MongoError::Remote { .. } => ErrorKind::Remote,
            MongoError::Serialization(_) | MongoError::Deserialization(_) => {
                ErrorKind::Serialization
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = MongoError::configuration("api key is required");
        assert_eq!(err.to_string(), "configuration error: api key is required");
    }

    #[test]
    fn test_remote_error() {
        let err = MongoError::remote(401, json!({ "error": "invalid session" }));
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("invalid session"));
        assert_eq!(err.status(), Some(401));
        assert!(err.is_remote_error());
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            MongoError::configuration("test").kind(),
            ErrorKind::Configuration
        );
        assert_eq!(MongoError::scope("test").kind(), ErrorKind::Scope);
        assert_eq!(MongoError::Timeout.kind(), ErrorKind::Transport);
        assert_eq!(
            MongoError::Deserialization("test".to_string()).kind(),
            ErrorKind::Serialization
        );
    }

    #[test]
    fn test_is_transport_error() {
        assert!(MongoError::transport("connection reset").is_transport_error());
        assert!(MongoError::Timeout.is_transport_error());
        assert!(!MongoError::scope("test").is_transport_error());
    }

    #[test]
    fn test_is_timeout() {
        assert!(MongoError::Timeout.is_timeout());
        assert!(!MongoError::transport("test").is_timeout());
    }

    #[test]
    fn test_status_absent_for_local_errors() {
        assert_eq!(MongoError::scope("test").status(), None);
        assert_eq!(MongoError::Timeout.status(), None);
    }

    #[test]
    fn test_error_message() {
        let err = MongoError::scope("Database or collection not specified");
        assert_eq!(
            err.message(),
            "scope error: Database or collection not specified"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: MongoError = json_err.into();
        assert!(matches!(err, MongoError::Serialization(_)));
    }
}
