//! # Error Types
//!
//! Domain-specific error types for venuesync-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  venuesync-core errors (this file)                                     │
//! │  ├── CoreError        - Record and kind errors                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  venuesync-client errors (separate crate)                              │
//! │  └── ApiError         - Config, transport and remote failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → caller                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while building records or resolving resource kinds.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A resource kind name did not match any known collection.
    #[error("Unknown resource kind: '{0}'")]
    UnknownResourceKind(String),

    /// A JSON value could not be used as a resource record.
    ///
    /// ## When This Occurs
    /// - The API answered with an array or scalar where an object was expected
    /// - An input file lists something other than objects
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a URL without a scheme).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two records of one desired list share a name.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownResourceKind("rooms".to_string());
        assert_eq!(err.to_string(), "Unknown resource kind: 'rooms'");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "api_key".to_string(),
        };
        assert_eq!(err.to_string(), "api_key is required");

        let err = ValidationError::Duplicate {
            field: "name".to_string(),
            value: "Lobby".to_string(),
        };
        assert_eq!(err.to_string(), "name 'Lobby' appears more than once");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
