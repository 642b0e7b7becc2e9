//! Unified engine error type.
//!
//! Wraps storage failures and rejected domain commands so callers can handle
//! both through one `Result`.

use charsheet_domain::DomainError;
use thiserror::Error;

use super::ports::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Storage read or write failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// The domain rejected the command.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Store(e) => e.is_not_found(),
            Self::Domain(e) => matches!(e, DomainError::NotFound { .. }),
        }
    }
}
