//! Timestamped membership records
//!
//! A record map remembers, per element, the timestamp of the last operation of
//! one kind (add or remove). Merging keeps the per-key maximum, which makes it
//! a join-semilattice: commutative, associative and idempotent.

use std::collections::HashMap;
use std::collections::hash_map;
use std::hash::Hash;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Element to timestamp map with max-merge semantics
///
/// An absent key behaves as a timestamp below every real timestamp, so the
/// maximum of a present and an absent entry is the present one.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "T: Eq + Hash + Serialize, Ts: Serialize",
        deserialize = "T: Eq + Hash + Deserialize<'de>, Ts: Deserialize<'de>"
    ))
)]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TimestampRecords<T, Ts> {
    entries: HashMap<T, Ts>,
}

impl<T, Ts> Default for TimestampRecords<T, Ts> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash, Ts: PartialEq> PartialEq for TimestampRecords<T, Ts> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T: Eq + Hash, Ts: Eq> Eq for TimestampRecords<T, Ts> {}

impl<T, Ts> TimestampRecords<T, Ts>
where
    T: Eq + Hash,
    Ts: Ord + Copy,
{
    /// Creates an empty record map
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded timestamp for `element`
    pub fn get(&self, element: &T) -> Option<Ts> {
        self.entries.get(element).copied()
    }

    /// Returns true if `element` has a record
    pub fn contains(&self, element: &T) -> bool {
        self.entries.contains_key(element)
    }

    /// Records `timestamp` for `element`, replacing any earlier record
    ///
    /// The write is unconditional: a timestamp older than the existing one
    /// still replaces it. Only merging keeps the maximum.
    pub fn record(&mut self, element: T, timestamp: Ts) {
        self.entries.insert(element, timestamp);
    }

    /// Number of elements with a record
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no element has a record
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(element, timestamp)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&T, Ts)> {
        self.entries.iter().map(|(element, &timestamp)| (element, timestamp))
    }

    /// Folds `other` into `self`, keeping the later timestamp per element
    pub fn merge_from(&mut self, other: &Self)
    where
        T: Clone,
    {
        for (element, &theirs) in &other.entries {
            match self.entries.entry(element.clone()) {
                hash_map::Entry::Occupied(mut slot) => {
                    if theirs > *slot.get() {
                        slot.insert(theirs);
                    }
                }
                hash_map::Entry::Vacant(slot) => {
                    slot.insert(theirs);
                }
            }
        }
    }

    /// Builds a fresh record map holding the per-element maximum of `a` and `b`
    pub fn merged(a: &Self, b: &Self) -> Self
    where
        T: Clone,
    {
        let mut entries = HashMap::with_capacity(a.len().max(b.len()));
        for (element, timestamp) in a.iter().chain(b.iter()) {
            entries
                .entry(element.clone())
                .and_modify(|current: &mut Ts| *current = (*current).max(timestamp))
                .or_insert(timestamp);
        }
        Self { entries }
    }
}

impl<T, Ts> FromIterator<(T, Ts)> for TimestampRecords<T, Ts>
where
    T: Eq + Hash,
    Ts: Ord + Copy,
{
    /// Collects pairs, keeping the last timestamp given for a repeated element
    fn from_iter<I: IntoIterator<Item = (T, Ts)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
