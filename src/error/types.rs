//! Core error types for lwwset

use thiserror::Error;

/// Main error type for CRDT state handling
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CRDTError {
    /// Remove records name elements that have no add record
    #[error("{count} remove record(s) have no matching add record")]
    OrphanTombstone {
        /// Number of offending remove records
        count: usize,
    },
}

impl CRDTError {
    /// Returns the error category as a string
    pub const fn category(&self) -> &'static str {
        match self {
            Self::OrphanTombstone { .. } => "State",
        }
    }
}

/// Result type for CRDT operations
pub type CRDTResult<T> = Result<T, CRDTError>;
