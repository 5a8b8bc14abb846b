//! Last-Writer-Wins Element Set CRDT
//!
//! A set that supports add and remove by remembering, per element, the
//! timestamp of the latest add and the latest remove. Membership is derived
//! from the two records; merging takes the per-element maximum of each.

use core::fmt::{self, Debug};
use std::collections::HashSet;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::clock::{SystemClock, TimestampSource};
use crate::error::{CRDTError, CRDTResult};
use crate::sets::records::TimestampRecords;
use crate::traits::CRDT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timestamp type of a source
pub type TimestampOf<S> = <S as TimestampSource>::Timestamp;

/// Last-Writer-Wins Element Set
///
/// Each replica owns its set and mutates it freely. Replicas converge by
/// exchanging states and calling [`CRDT::merging`] or [`CRDT::merge`], which
/// are commutative, associative and idempotent.
///
/// An element is a member iff it has an add record and either no remove
/// record or an add timestamp strictly greater than its remove timestamp.
/// Equal timestamps resolve in favour of the remove.
///
/// # Type Parameters
/// - `T`: The element type, usable as a hash map key
/// - `S`: The [`TimestampSource`] consulted when an operation carries no
///   explicit timestamp (defaults to [`SystemClock`])
///
/// # Example
/// ```rust
/// use lwwset::prelude::*;
///
/// let mut list = LWWElementSet::<&str, LogicalClock>::new();
/// list.add("milk").add("eggs").remove(&"milk");
///
/// let mut other = LWWElementSet::<&str, LogicalClock>::new();
/// other.add("bread");
///
/// let merged = list.merging(&other);
/// assert!(merged.lookup(&"eggs"));
/// assert!(merged.lookup(&"bread"));
/// assert!(!merged.lookup(&"milk"));
/// ```
#[derive(Clone)]
pub struct LWWElementSet<T, S: TimestampSource = SystemClock> {
    /// Last add timestamp per element ever added
    adds: TimestampRecords<T, TimestampOf<S>>,

    /// Last remove timestamp per element ever removed (tombstones)
    removes: TimestampRecords<T, TimestampOf<S>>,

    source: S,
}

/// Snapshot of a replica's records, detached from its timestamp source
///
/// This is what replicas exchange; transport is left to the caller.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "T: Eq + Hash + Serialize, Ts: Serialize",
        deserialize = "T: Eq + Hash + Deserialize<'de>, Ts: Deserialize<'de>"
    ))
)]
pub struct ReplicaState<T, Ts> {
    /// Add records
    pub adds: TimestampRecords<T, Ts>,
    /// Remove records
    pub removes: TimestampRecords<T, Ts>,
}

impl<T: Eq + Hash, Ts: PartialEq> PartialEq for ReplicaState<T, Ts> {
    fn eq(&self, other: &Self) -> bool {
        self.adds == other.adds && self.removes == other.removes
    }
}

impl<T: Eq + Hash, Ts: Eq> Eq for ReplicaState<T, Ts> {}

impl<T, S> LWWElementSet<T, S>
where
    T: Eq + Hash,
    S: TimestampSource,
{
    /// Creates an empty set that draws timestamps from `source`
    pub fn with_source(source: S) -> Self {
        Self {
            adds: TimestampRecords::new(),
            removes: TimestampRecords::new(),
            source,
        }
    }

    /// Returns true if `element` is currently a member
    ///
    /// Two map lookups; the value set is never materialized.
    pub fn lookup(&self, element: &T) -> bool {
        match self.adds.get(element) {
            None => false,
            Some(added) => self.removes.get(element).is_none_or(|removed| added > removed),
        }
    }

    /// Iterates over the current members in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.adds
            .iter()
            .filter(|&(element, added)| {
                self.removes.get(element).is_none_or(|removed| added > removed)
            })
            .map(|(element, _)| element)
    }

    /// Returns the current members
    pub fn values(&self) -> HashSet<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Number of current members
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if the set has no current member
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Last add timestamp recorded for `element`
    pub fn add_timestamp(&self, element: &T) -> Option<TimestampOf<S>> {
        self.adds.get(element)
    }

    /// Last remove timestamp recorded for `element`
    pub fn remove_timestamp(&self, element: &T) -> Option<TimestampOf<S>> {
        self.removes.get(element)
    }

    /// Number of elements with an add record, members or not
    pub fn add_record_count(&self) -> usize {
        self.adds.len()
    }

    /// Number of elements with a remove record
    pub fn tombstone_count(&self) -> usize {
        self.removes.len()
    }

    /// Returns the timestamp source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Replaces the timestamp source; recorded timestamps are kept
    pub fn set_source(&mut self, source: S) {
        self.source = source;
    }

    /// Returns a snapshot of both record maps
    pub fn state(&self) -> ReplicaState<T, TimestampOf<S>>
    where
        T: Clone,
    {
        ReplicaState {
            adds: self.adds.clone(),
            removes: self.removes.clone(),
        }
    }

    /// Consumes the set, returning its records
    pub fn into_state(self) -> ReplicaState<T, TimestampOf<S>> {
        ReplicaState {
            adds: self.adds,
            removes: self.removes,
        }
    }
}

impl<T, S> LWWElementSet<T, S>
where
    T: Eq + Hash,
    S: TimestampSource,
{
    /// Creates a set holding `elements`, each added at its own `source.now()`
    pub fn with_elements<I>(elements: I, source: S) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::with_source(source);
        set.extend(elements);
        set
    }

    /// Adds `element` at the source's current timestamp
    pub fn add(&mut self, element: T) -> &mut Self {
        let at = self.source.now();
        self.add_at(element, at)
    }

    /// Adds `element` at `at`
    ///
    /// Always recorded, replacing the previous add timestamp even when `at`
    /// is earlier.
    pub fn add_at(&mut self, element: T, at: TimestampOf<S>) -> &mut Self {
        trace!(?at, "add");
        self.adds.record(element, at);
        self
    }

    /// Removes `element` at the source's current timestamp
    ///
    /// See [`remove_at`](Self::remove_at) for the membership guard. No
    /// timestamp is drawn when the remove is dropped.
    pub fn remove(&mut self, element: &T) -> &mut Self
    where
        T: Clone,
    {
        if !self.lookup(element) {
            trace!("remove of non-member ignored");
            return self;
        }
        let at = self.source.now();
        self.record_remove(element, at)
    }

    /// Removes `element` at `at`
    ///
    /// Only current members get a remove record. Removing a non-member is a
    /// silent no-op; add the element first to force a tombstone.
    pub fn remove_at(&mut self, element: &T, at: TimestampOf<S>) -> &mut Self
    where
        T: Clone,
    {
        if !self.lookup(element) {
            trace!(?at, "remove of non-member ignored");
            return self;
        }
        self.record_remove(element, at)
    }

    fn record_remove(&mut self, element: &T, at: TimestampOf<S>) -> &mut Self
    where
        T: Clone,
    {
        trace!(?at, "remove");
        self.removes.record(element.clone(), at);
        self
    }

    /// Rebuilds a set from a snapshot
    ///
    /// Fails if a remove record names an element without an add record; no
    /// sequence of set operations or merges can produce such a state.
    pub fn from_state(state: ReplicaState<T, TimestampOf<S>>, source: S) -> CRDTResult<Self> {
        check_tombstones(&state.adds, &state.removes).inspect_err(|err| {
            debug!(%err, "rejected replica state");
        })?;
        Ok(Self {
            adds: state.adds,
            removes: state.removes,
            source,
        })
    }
}

impl<T, S> LWWElementSet<T, S>
where
    T: Eq + Hash,
    S: TimestampSource + Default,
{
    /// Creates an empty set with a default timestamp source
    pub fn new() -> Self {
        Self::with_source(S::default())
    }

    /// Creates a set holding `elements` with a default timestamp source
    pub fn from_elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::with_elements(elements, S::default())
    }
}

fn check_tombstones<T, Ts>(
    adds: &TimestampRecords<T, Ts>,
    removes: &TimestampRecords<T, Ts>,
) -> CRDTResult<()>
where
    T: Eq + Hash,
    Ts: Ord + Copy,
{
    match removes.iter().filter(|(element, _)| !adds.contains(element)).count() {
        0 => Ok(()),
        count => Err(CRDTError::OrphanTombstone { count }),
    }
}

impl<T, S> Default for LWWElementSet<T, S>
where
    T: Eq + Hash,
    S: TimestampSource + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> Extend<T> for LWWElementSet<T, S>
where
    T: Eq + Hash,
    S: TimestampSource,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, elements: I) {
        for element in elements {
            self.add(element);
        }
    }
}

impl<T, S> FromIterator<T> for LWWElementSet<T, S>
where
    T: Eq + Hash,
    S: TimestampSource + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(elements: I) -> Self {
        Self::from_elements(elements)
    }
}

impl<T, S> CRDT for LWWElementSet<T, S>
where
    T: Eq + Hash + Clone,
    S: TimestampSource + Clone,
{
    fn merge(&mut self, other: &Self) {
        self.adds.merge_from(&other.adds);
        self.removes.merge_from(&other.removes);
        debug!(
            adds = self.adds.len(),
            removes = self.removes.len(),
            "merged replica state"
        );
    }

    fn merging(&self, other: &Self) -> Self
    where
        Self: Clone,
    {
        let merged = Self {
            adds: TimestampRecords::merged(&self.adds, &other.adds),
            removes: TimestampRecords::merged(&self.removes, &other.removes),
            source: self.source.clone(),
        };
        debug!(
            adds = merged.adds.len(),
            removes = merged.removes.len(),
            "merged replica states"
        );
        merged
    }

    fn validate(&self) -> CRDTResult<()> {
        check_tombstones(&self.adds, &self.removes)
    }
}

/// Two sets are equal when their current members are equal, whatever their
/// histories.
impl<T, S> PartialEq for LWWElementSet<T, S>
where
    T: Eq + Hash,
    S: TimestampSource,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|element| other.lookup(element))
    }
}

impl<T, S> Eq for LWWElementSet<T, S>
where
    T: Eq + Hash,
    S: TimestampSource,
{
}

impl<T, S> Debug for LWWElementSet<T, S>
where
    T: Eq + Hash + Debug,
    S: TimestampSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
