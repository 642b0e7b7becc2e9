//! Error types for port operations.

/// Storage operation errors with context for debugging.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Record not found - includes record type and key for actionable error messages.
    #[error("{record_type} not found: {key}")]
    NotFound {
        record_type: &'static str,
        key: String,
    },

    /// Backend operation failed - includes operation name for tracing.
    #[error("Storage error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Create a NotFound error with record type and key context.
    pub fn not_found(record_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            record_type,
            key: key.to_string(),
        }
    }

    /// Create a Backend error with operation context.
    pub fn backend(operation: &'static str, message: impl ToString) -> Self {
        Self::Backend {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
