//! Common utilities and shared code for property-based testing of lwwset
//!
//! This module provides:
//! - Proptest configuration for different test scenarios
//! - Generators for replica operation histories
//! - Helper functions for verifying CRDT properties

#![allow(dead_code)]
#![allow(special_module_name)]

use lwwset::prelude::*;
use proptest::prelude::*;
use proptest_derive::Arbitrary;

/// Set type used throughout the property tests
pub type TestSet = LWWElementSet<u8, LogicalClock>;

/// Standard proptest configuration for CRDT property tests
pub fn crdt_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        max_shrink_iters: 200,
        timeout: 2000,
        ..ProptestConfig::default()
    }
}

/// Configuration for multi-replica convergence tests (fewer cases)
pub fn integration_config() -> ProptestConfig {
    ProptestConfig {
        cases: 32,
        max_shrink_iters: 50,
        timeout: 5000,
        ..ProptestConfig::default()
    }
}

/// A local operation with an explicit timestamp
///
/// Small element and timestamp ranges make collisions (same element touched by
/// several replicas, equal timestamps) frequent.
#[derive(Debug, Clone, Arbitrary)]
pub enum Op {
    /// Add an element
    Add(
        #[proptest(strategy = "0u8..12")] u8,
        #[proptest(strategy = "1u64..40")] u64,
    ),
    /// Remove an element
    Remove(
        #[proptest(strategy = "0u8..12")] u8,
        #[proptest(strategy = "1u64..40")] u64,
    ),
}

/// Applies `ops` in order to a fresh set
pub fn build_set(ops: &[Op]) -> TestSet {
    let mut set = TestSet::new();
    for op in ops {
        match *op {
            Op::Add(element, at) => {
                set.add_at(element, CompactTimestamp::new(at));
            }
            Op::Remove(element, at) => {
                set.remove_at(&element, CompactTimestamp::new(at));
            }
        }
    }
    set
}

/// Generates operation histories
pub fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..24)
}

/// Generates replicas built from arbitrary histories
pub fn replica_strategy() -> impl Strategy<Value = TestSet> {
    ops_strategy().prop_map(|ops| build_set(&ops))
}

/// Helper function to verify CRDT commutativity property
/// For any two CRDTs a and b: merge(a, b) = merge(b, a)
pub fn assert_crdt_commutativity<T>(a: &T, b: &T) -> bool
where
    T: CRDT + Clone + PartialEq,
{
    a.merging(b) == b.merging(a)
}

/// Helper function to verify CRDT associativity property
/// For any three CRDTs a, b, c: merge(merge(a, b), c) = merge(a, merge(b, c))
pub fn assert_crdt_associativity<T>(a: &T, b: &T, c: &T) -> bool
where
    T: CRDT + Clone + PartialEq,
{
    a.merging(b).merging(c) == a.merging(&b.merging(c))
}

/// Helper function to verify CRDT idempotence property
/// For any CRDT a: merge(a, a) = a
pub fn assert_crdt_idempotence<T>(a: &T) -> bool
where
    T: CRDT + Clone + PartialEq,
{
    a.merging(a) == *a
}

/// Helper function to verify eventual consistency
/// Folding all replicas front-to-back and back-to-front gives the same state
pub fn assert_eventual_consistency<T>(replicas: &[T]) -> bool
where
    T: CRDT + Clone + PartialEq,
{
    let Some((first, rest)) = replicas.split_first() else {
        return true;
    };

    let forward = rest
        .iter()
        .fold(first.clone(), |acc, replica| acc.merging(replica));

    let mut backward = replicas[replicas.len() - 1].clone();
    for replica in replicas.iter().rev().skip(1) {
        backward.merge(replica);
    }

    forward == backward
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_set() {
        let set = build_set(&[Op::Add(1, 5), Op::Remove(1, 6), Op::Add(2, 1)]);
        assert!(!set.lookup(&1));
        assert!(set.lookup(&2));
    }

    #[test]
    fn test_eventual_consistency_trivial() {
        assert!(assert_eventual_consistency::<TestSet>(&[]));
        assert!(assert_eventual_consistency(&[build_set(&[Op::Add(3, 3)])]));
    }
}
