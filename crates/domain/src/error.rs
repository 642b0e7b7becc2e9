//! Unified error types for the domain layer
//!
//! Most in-play commands report failure through their return value (`bool`,
//! `Option`, outcome enums). `DomainError` covers the cases where a caller
//! hands the domain something it cannot act on at all.

use thiserror::Error;

use crate::value_objects::DiceParseError;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., incomplete level-up choices)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// Creates a validation error for rejected input.
    ///
    /// Use this when a command receives data that breaks a rule the
    /// caller was expected to enforce first, such as level-up options
    /// that did not pass the wizard's checks.
    ///
    /// # Example
    /// ```ignore
    /// if allocated != ASI_POINTS {
    ///     return Err(DomainError::validation("ability improvements must spend exactly 2 points"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }
}

impl From<DiceParseError> for DomainError {
    fn from(err: DiceParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("subclass must be chosen");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: subclass must be chosen");
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Subclass", "champion");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Subclass"));
        assert!(err.to_string().contains("champion"));
    }

    #[test]
    fn test_constraint_error() {
        let err = DomainError::constraint("already at maximum level");
        assert_eq!(
            err.to_string(),
            "Constraint violation: already at maximum level"
        );
    }

    #[test]
    fn test_from_dice_parse_error() {
        let dice_err = DiceParseError::Empty;
        let domain_err: DomainError = dice_err.into();
        assert!(matches!(domain_err, DomainError::Parse(_)));
        assert!(domain_err.to_string().contains("Empty hit die"));
    }
}
