//! Error handling module for lwwset
//!
//! Set operations are total. Errors only arise when a replica state is
//! restored from an external snapshot or validated.

pub mod types;

// Re-export main types
pub use types::{CRDTError, CRDTResult};
