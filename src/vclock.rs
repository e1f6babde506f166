//! A replica → count map joined by pointwise `max`.
//!
//! Every replica of a logical counter owns one slot. A slot only ever grows:
//! `witness` and `merge` keep the larger of the known and the offered count,
//! which makes the merge a join on a semilattice.
//!
//! # Examples
//!
//! ```
//! use convergent::VClock;
//! let (mut a, mut b) = (VClock::new(), VClock::new());
//! a.witness("A".to_string(), 2);
//! b.witness("A".to_string(), 1);
//! assert!(a > b);
//!
//! b.witness("B".to_string(), 4);
//! a.merge(&b);
//! assert_eq!(a.get(&"A".to_string()), 2);
//! assert_eq!(a.get(&"B".to_string()), 4);
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A counter holds the contribution of a single replica.
pub type Counter = u64;

/// Replica identifier. Every replica of a logical counter needs a distinct one.
pub trait Actor: Ord + Clone + Hash + Send + Serialize + DeserializeOwned + Debug {}
impl<A: Ord + Clone + Hash + Send + Serialize + DeserializeOwned + Debug> Actor for A {}

/// Logical counter identifier. Only states with equal ids may be merged.
pub trait CounterId: Eq + Clone + Send + Serialize + DeserializeOwned + Debug {}
impl<I: Eq + Clone + Send + Serialize + DeserializeOwned + Debug> CounterId for I {}

/// A `VClock` maps replicas to the highest count known for each.
///
/// Replicas missing from the map have an implied count of 0, so a slot is
/// only stored once it is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound(deserialize = ""), from = "RawVClock<A>")]
pub struct VClock<A: Actor> {
    dots: BTreeMap<A, Counter>,
}

/// Wire form of a `VClock`, before zero slots are dropped.
#[derive(Deserialize)]
#[serde(bound(deserialize = ""))]
struct RawVClock<A: Actor> {
    dots: BTreeMap<A, Counter>,
}

impl<A: Actor> From<RawVClock<A>> for VClock<A> {
    fn from(raw: RawVClock<A>) -> Self {
        raw.dots.into_iter().collect()
    }
}

impl<A: Actor> Default for VClock<A> {
    fn default() -> Self {
        VClock::new()
    }
}

impl<A: Actor> PartialOrd for VClock<A> {
    fn partial_cmp(&self, other: &VClock<A>) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if other.dots.iter().all(|(a, c)| self.get(a) >= *c) {
            Some(Ordering::Greater)
        } else if self.dots.iter().all(|(a, c)| other.get(a) >= *c) {
            Some(Ordering::Less)
        } else {
            None
        }
    }
}

impl<A: Actor> VClock<A> {
    /// Returns a new, empty `VClock`.
    pub fn new() -> VClock<A> {
        VClock {
            dots: BTreeMap::new(),
        }
    }

    /// Record `counter` for `actor` if it dominates what is already known.
    ///
    /// # Examples
    ///
    /// ```
    /// use convergent::VClock;
    /// let mut a = VClock::new();
    /// a.witness('A', 2);
    /// a.witness('A', 1); // ignored because 2 dominates 1
    /// assert_eq!(a.get(&'A'), 2);
    /// ```
    pub fn witness(&mut self, actor: A, counter: Counter) {
        if counter == 0 {
            return;
        }
        let slot = self.dots.entry(actor).or_insert(0);
        if counter > *slot {
            *slot = counter;
        }
    }

    /// Join `other` into `self`, keeping the larger count for every replica.
    pub fn merge(&mut self, other: &VClock<A>) {
        for (actor, counter) in other.dots.iter() {
            self.witness(actor.clone(), *counter);
        }
    }

    /// Drop the slot of `actor`, returning what it held.
    pub fn forget(&mut self, actor: &A) -> Counter {
        self.dots.remove(actor).unwrap_or(0)
    }

    /// Return the count known for this actor.
    /// All actors not in the vclock have an implied count of 0
    pub fn get(&self, actor: &A) -> Counter {
        self.dots.get(actor).copied().unwrap_or(0)
    }

    /// Returns `true` if this vector clock contains nothing.
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    /// Number of replicas with a non-zero count.
    pub fn len(&self) -> usize {
        self.dots.len()
    }

    /// Returns an iterator over the slots in this vclock
    pub fn iter(&self) -> impl Iterator<Item = (&A, &Counter)> {
        self.dots.iter()
    }

    /// Sum of all slots, or `None` if it does not fit in a `u64`.
    pub fn checked_sum(&self) -> Option<Counter> {
        self.dots
            .values()
            .try_fold(0u64, |acc, c| acc.checked_add(*c))
    }

    /// Sum of all slots, clamped to `u64::MAX`.
    pub fn saturating_sum(&self) -> Counter {
        self.dots
            .values()
            .fold(0u64, |acc, c| acc.saturating_add(*c))
    }
}

impl<A: Actor> std::iter::FromIterator<(A, Counter)> for VClock<A> {
    fn from_iter<I: IntoIterator<Item = (A, Counter)>>(iter: I) -> Self {
        let mut clock = Self::new();
        for (actor, counter) in iter {
            clock.witness(actor, counter);
        }
        clock
    }
}

impl<A: Actor> From<Vec<(A, Counter)>> for VClock<A> {
    fn from(vec: Vec<(A, Counter)>) -> Self {
        vec.into_iter().collect()
    }
}
