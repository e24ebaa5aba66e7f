//! # Validation Module
//!
//! Input checks used when building a client and before handing a desired
//! list to the sync engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Client construction (fatal)                                  │
//! │  ├── api key, organization id present                                  │
//! │  └── server url is http(s), concurrency in range                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Desired records (advisory)                                   │
//! │  └── name / venueId / owner present, names unique                      │
//! │      The engine itself never rejects a list: missing names produce     │
//! │      wrong matches, which is the caller's responsibility.              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote API                                                   │
//! │  └── ownership, publication rules, schema                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::record::Record;
use crate::MAX_CONCURRENCY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Credential Validators
// =============================================================================

/// Validates an API key.
///
/// ```rust
/// use venuesync_core::validation::validate_api_key;
///
/// assert!(validate_api_key("a1b2c3").is_ok());
/// assert!(validate_api_key("  ").is_err());
/// ```
pub fn validate_api_key(api_key: &str) -> ValidationResult<()> {
    require("api_key", api_key)
}

/// Validates an organization identifier.
pub fn validate_organization_id(organization_id: &str) -> ValidationResult<()> {
    require("organization_id", organization_id)
}

/// Validates the API server URL.
///
/// ## Rules
/// - Must not be empty
/// - Must start with `http://` or `https://`
pub fn validate_server_url(server_url: &str) -> ValidationResult<()> {
    require("server_url", server_url)?;

    if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
        return Err(ValidationError::InvalidFormat {
            field: "server_url".to_string(),
            reason: format!("must start with http:// or https://, got: {server_url}"),
        });
    }

    Ok(())
}

/// Validates the number of concurrent requests per sync phase.
pub fn validate_concurrency(concurrency: usize) -> ValidationResult<()> {
    if concurrency == 0 || concurrency > MAX_CONCURRENCY {
        return Err(ValidationError::OutOfRange {
            field: "concurrency".to_string(),
            min: 1,
            max: MAX_CONCURRENCY as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Checks one desired record for the fields sync matching relies on.
pub fn validate_desired_record(record: &Record) -> ValidationResult<()> {
    for field in ["name", "venueId", "owner"] {
        require(field, record.str_field(field).unwrap_or_default())?;
    }
    Ok(())
}

/// Checks a whole desired list, returning every problem found.
///
/// Duplicate names are reported once per extra occurrence.
pub fn validate_desired(records: &[Record]) -> Vec<ValidationError> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for record in records {
        if let Err(e) = validate_desired_record(record) {
            problems.push(e);
        }
        if let Some(name) = record.name() {
            if !seen.insert(name) {
                problems.push(ValidationError::Duplicate {
                    field: "name".to_string(),
                    value: name.to_string(),
                });
            }
        }
    }

    problems
}

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_credentials() {
        assert!(validate_api_key("key").is_ok());
        assert!(validate_api_key("").is_err());
        assert!(validate_organization_id("org-1").is_ok());
        assert!(validate_organization_id(" ").is_err());
    }

    #[test]
    fn test_validate_server_url() {
        assert!(validate_server_url("https://www.mapwize.io").is_ok());
        assert!(validate_server_url("http://localhost:3000").is_ok());
        assert!(validate_server_url("ftp://example.com").is_err());
        assert!(validate_server_url("").is_err());
    }

    #[test]
    fn test_validate_concurrency() {
        assert!(validate_concurrency(1).is_ok());
        assert!(validate_concurrency(10).is_ok());
        assert!(validate_concurrency(0).is_err());
        assert!(validate_concurrency(MAX_CONCURRENCY + 1).is_err());
    }

    #[test]
    fn test_validate_desired() {
        let records = Record::list_from_value(json!([
            {"name": "A", "venueId": "v1", "owner": "o1"},
            {"name": "A", "venueId": "v1", "owner": "o1"},
            {"venueId": "v1", "owner": "o1"},
            {"name": "C", "owner": "o1"}
        ]))
        .unwrap();

        let problems = validate_desired(&records);
        assert_eq!(problems.len(), 3);
        assert!(problems
            .iter()
            .any(|p| matches!(p, ValidationError::Duplicate { value, .. } if value == "A")));
    }
}
