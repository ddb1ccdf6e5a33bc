//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → DbError::Validation → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A stored enum column held a value this build does not know.
    ///
    /// ## When This Occurs
    /// - A row was written by a newer schema version
    /// - Manual edits to the database
    #[error("Unknown {kind} value: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the checks in [`crate::validation`] before a workflow touches
/// the database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be zero.
    #[error("{field} must not be zero")]
    MustBeNonZero { field: String },
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
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "category_name".to_string(),
        };
        assert_eq!(err.to_string(), "category_name is required");

        let err = ValidationError::TooLong {
            field: "item_name".to_string(),
            max: 150,
        };
        assert_eq!(err.to_string(), "item_name must be at most 150 characters");

        let err = ValidationError::MustBeNonZero {
            field: "quantity_change".to_string(),
        };
        assert_eq!(err.to_string(), "quantity_change must not be zero");
    }

    #[test]
    fn test_unknown_variant_message() {
        let err = CoreError::UnknownVariant {
            kind: "transaction type",
            value: "teleport".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown transaction type value: 'teleport'");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "username".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
