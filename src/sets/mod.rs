//! Set CRDT implementations
//!
//! This module provides the Last-Writer-Wins Element Set and the timestamped
//! record maps it is built from.

pub mod lww;
pub mod records;

// Re-export main types
pub use lww::{LWWElementSet, ReplicaState, TimestampOf};
pub use records::TimestampRecords;
