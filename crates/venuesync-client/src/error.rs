//! # Client Error Types
//!
//! Error types for API calls and sync runs.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       API Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Remote              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  MissingApiKey  │  │  Connection     │  │  Remote {status, body}  │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  NotFound               │ │
//! │  │  ConfigLoad...  │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐  │
//! │  │   Records       │  │     Internal                                │  │
//! │  │                 │  │                                             │  │
//! │  │  MissingId      │  │  UnsupportedKind                            │  │
//! │  │  InvalidRecord  │  │  Internal (task join failures)              │  │
//! │  │  Serialization  │  │                                             │  │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is retried automatically. A failed sync is resumed by
//! running it again.

use thiserror::Error;
use venuesync_core::{CoreError, ResourceKind, ValidationError};

/// Result type alias for client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error type covering every client and sync failure.
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// No API key configured.
    #[error("API key not configured. Set [api].api_key or VENUESYNC_API_KEY.")]
    MissingApiKey,

    /// No organization configured.
    #[error("Organization ID not configured. Set [api].organization_id or VENUESYNC_ORGANIZATION_ID.")]
    MissingOrganizationId,

    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Invalid server URL.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced a response.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// The server answered with an unexpected status.
    #[error("Server returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// The server answered 404.
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    // =========================================================================
    // Record Errors
    // =========================================================================
    /// An update or delete was attempted on a record without `_id`.
    #[error("Cannot modify {kind} without an _id")]
    MissingId { kind: ResourceKind },

    /// A payload could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// A payload was valid JSON but not the expected shape.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// The operation is not available for this kind.
    #[error("Operation not supported for {kind}: {reason}")]
    UnsupportedKind { kind: ResourceKind, reason: String },

    /// A spawned task panicked or was cancelled.
    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApiError::Serialization(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidConfig(err.to_string())
        } else {
            ApiError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ApiError {
    fn from(err: toml::de::Error) -> Self {
        ApiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ApiError {
    fn from(err: toml::ser::Error) -> Self {
        ApiError::ConfigSaveFailed(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            other => ApiError::InvalidRecord(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidConfig(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ApiError {
    /// Returns true if running the same operation again might succeed.
    ///
    /// ## Retryable Errors
    /// - Connection failures and timeouts
    /// - 5xx and 429 responses
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::ConnectionFailed(_) | ApiError::Timeout(_) => true,
            ApiError::Remote { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ApiError::MissingApiKey
                | ApiError::MissingOrganizationId
                | ApiError::InvalidConfig(_)
                | ApiError::InvalidUrl(_)
                | ApiError::ConfigLoadFailed(_)
                | ApiError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the request never reached a server response.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, ApiError::ConnectionFailed(_) | ApiError::Timeout(_))
    }

    /// Returns the HTTP status for errors carrying one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            ApiError::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ApiError::ConnectionFailed("refused".into()).is_retryable());
        assert!(ApiError::Timeout("30s".into()).is_retryable());
        assert!(ApiError::Remote { status: 503, body: String::new() }.is_retryable());
        assert!(ApiError::Remote { status: 429, body: String::new() }.is_retryable());

        assert!(!ApiError::Remote { status: 400, body: String::new() }.is_retryable());
        assert!(!ApiError::MissingApiKey.is_retryable());
        assert!(!ApiError::MissingId { kind: ResourceKind::Place }.is_retryable());
    }

    #[test]
    fn test_config_errors() {
        assert!(ApiError::MissingOrganizationId.is_config_error());
        assert!(ApiError::InvalidUrl("ftp://x".into()).is_config_error());
        assert!(!ApiError::Timeout("x".into()).is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Remote {
            status: 422,
            body: r#"{"message":"alias taken"}"#.into(),
        };
        assert!(err.to_string().contains("422"));
        assert!(err.to_string().contains("alias taken"));
        assert_eq!(err.status(), Some(422));

        let err = ApiError::NotFound {
            resource: "place".into(),
            id: "abc".into(),
        };
        assert_eq!(err.to_string(), "place not found: abc");
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: ApiError = ValidationError::Required {
            field: "server_url".into(),
        }
        .into();
        assert!(err.is_config_error());
    }
}
