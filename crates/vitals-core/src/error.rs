//! Error types surfaced by the ledger.
//!
//! Only two kinds of failure ever reach a caller. Malformed stored records
//! are not errors: the normalizer drops them and reports a count instead.

use thiserror::Error;

/// Ledger errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A caller-supplied value violates a numeric or presence constraint.
    /// Nothing has been written when this is returned.
    #[error("{0}")]
    Validation(String),

    /// The backend could not persist a collection. The in-memory copy
    /// already holds the new state and stays authoritative for the session.
    #[error("failed to persist '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }
}

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
