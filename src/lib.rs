#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

//! **State-based Last-Writer-Wins Element Set**
//!
//! lwwset implements the LWW-Element-Set Conflict-free Replicated Data Type.
//! Independent replicas add and remove elements locally, without coordination,
//! and later merge into one deterministic state.
//!
//! ## How it works
//!
//! Each set keeps two record maps: the last add timestamp and the last remove
//! timestamp of every element it has seen. An element is a member when its add
//! timestamp is strictly greater than its remove timestamp (or it was never
//! removed). Equal timestamps favour the remove.
//!
//! Merging two sets takes, per element, the maximum timestamp of each map.
//! That merge is commutative, associative and idempotent, so replicas converge
//! whatever the order in which they exchange state.
//!
//! ## Features
//!
//! - `serde` - Serde support for [`ReplicaState`], [`TimestampRecords`] and
//!   [`CompactTimestamp`], the data replicas exchange
//!
//! ## Quick Start
//!
//! ```rust
//! use lwwset::prelude::*;
//!
//! let mut replica_a = LWWElementSet::<u32, LogicalClock>::new();
//! replica_a.add_at(1, CompactTimestamp::new(1));
//! replica_a.remove_at(&1, CompactTimestamp::new(2));
//!
//! let mut replica_b = LWWElementSet::<u32, LogicalClock>::new();
//! replica_b.add_at(1, CompactTimestamp::new(3));
//! replica_b.add_at(3, CompactTimestamp::new(4));
//!
//! // The later add on replica b wins over the remove on replica a
//! let merged = replica_a.merging(&replica_b);
//! assert!(merged.lookup(&1));
//! assert!(merged.lookup(&3));
//! assert_eq!(merged, replica_b.merging(&replica_a));
//! ```
//!
//! ## Timestamps
//!
//! Operations without an explicit timestamp draw one from the set's
//! [`TimestampSource`]. [`SystemClock`] reads wall-clock time, bumped past the
//! last issued value so one replica never repeats a timestamp; [`LogicalClock`]
//! is a deterministic counter that can be shared between replicas through
//! `Arc` or `Rc`. Replicas with skewed clocks can resurrect or lose elements
//! on merge: there is no replica-id tie-break.
//!
//! [`ReplicaState`]: crate::sets::ReplicaState
//! [`TimestampRecords`]: crate::sets::TimestampRecords
//! [`CompactTimestamp`]: crate::clock::CompactTimestamp
//! [`TimestampSource`]: crate::clock::TimestampSource
//! [`SystemClock`]: crate::clock::SystemClock
//! [`LogicalClock`]: crate::clock::LogicalClock

#![deny(missing_docs)]
#![warn(clippy::all)]

// Core infrastructure modules
pub mod clock;
pub mod error;
pub mod traits;

// CRDT modules
pub mod sets;

/// Prelude module of lwwset
///
/// Convenient re-exports for common lwwset types and traits
pub mod prelude {

    // Re-export core traits
    pub use crate::traits::*;

    // Re-export error types
    pub use crate::error::{CRDTError, CRDTResult};

    // Re-export clock types
    pub use crate::clock::{CompactTimestamp, LogicalClock, SystemClock, TimestampSource};

    // Re-export sets
    pub use crate::sets::{LWWElementSet, ReplicaState, TimestampRecords};
}
