//! Base CRDT trait definition
//!
//! This module defines the fundamental trait that state-based Conflict-free
//! Replicated Data Types implement.

use crate::error::CRDTResult;

/// Base trait for state-based Conflict-free Replicated Data Types
///
/// Merging is total: two replica states can always be combined.
pub trait CRDT {
    /// Merges another CRDT instance into this one
    ///
    /// This operation must be:
    /// - Commutative: merge(a, b) = merge(b, a)
    /// - Associative: merge(merge(a, b), c) = merge(a, merge(b, c))
    /// - Idempotent: merge(a, a) = a
    fn merge(&mut self, other: &Self);

    /// Returns the merge of `self` and `other` as a new instance
    ///
    /// Neither operand is modified.
    fn merging(&self, other: &Self) -> Self
    where
        Self: Clone,
    {
        let mut merged = self.clone();
        merged.merge(other);
        merged
    }

    /// Validates the internal consistency of the CRDT
    fn validate(&self) -> CRDTResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Max-register used to exercise the provided methods
    #[derive(Clone, Debug, PartialEq)]
    struct MockCRDT {
        value: u32,
    }

    impl CRDT for MockCRDT {
        fn merge(&mut self, other: &Self) {
            self.value = self.value.max(other.value);
        }

        fn validate(&self) -> CRDTResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_crdt_merge() {
        let mut crdt1 = MockCRDT { value: 10 };
        let crdt2 = MockCRDT { value: 20 };

        crdt1.merge(&crdt2);
        assert_eq!(crdt1.value, 20);
    }

    #[test]
    fn test_crdt_merging_leaves_operands() {
        let crdt1 = MockCRDT { value: 10 };
        let crdt2 = MockCRDT { value: 20 };

        let merged = crdt1.merging(&crdt2);
        assert_eq!(merged.value, 20);
        assert_eq!(crdt1.value, 10);
        assert_eq!(crdt2.value, 20);
        assert!(merged.validate().is_ok());
    }
}
