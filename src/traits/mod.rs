//! Core CRDT traits module
//!
//! This module defines the trait shared by the state-based CRDTs of the crate.

pub mod crdt;

// Re-export main traits
pub use crdt::CRDT;
