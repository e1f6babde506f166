use std::fmt;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::snapshot::Snapshot;
use crate::traits::CvRDT;
use crate::vclock::{Actor, Counter, CounterId};

/// `GCounter` is a grow-only counter shared between threads.
///
/// One `GCounter` is one replica of a logical counter. It is mutated in place
/// through `&self`, so it can sit behind an `Arc` and be incremented and
/// merged from many threads at once. All state lives in a single [`Snapshot`]
/// behind a read-write lock: reads see `local` and the peer view from the
/// same instant, and read-modify-write operations serialize.
///
/// # Examples
///
/// ```
/// use convergent::GCounter;
///
/// let a = GCounter::new("likes".to_string(), 1u32);
/// let b = GCounter::with_initial("likes".to_string(), 2u32, 7);
///
/// a.increment_by(10).unwrap();
/// a.merge(&b).unwrap();
/// assert_eq!(a.value(), 17);
///
/// b.increment().unwrap();
/// a.merge(&b).unwrap();
/// assert_eq!(a.value(), 18);
/// ```
pub struct GCounter<I: CounterId, R: Actor> {
    // copies of the ids in `state`, which never change
    counter_id: I,
    replica_id: R,
    state: RwLock<Snapshot<I, R>>,
}

impl<I: CounterId, R: Actor> GCounter<I, R> {
    /// Produce a new `GCounter` starting at zero.
    pub fn new(counter_id: I, replica_id: R) -> Self {
        Self::with_initial(counter_id, replica_id, 0)
    }

    /// Produce a new `GCounter` whose own contribution starts at `initial`.
    pub fn with_initial(counter_id: I, replica_id: R, initial: Counter) -> Self {
        GCounter::from(Snapshot::new(counter_id, replica_id, initial))
    }

    /// Id of the logical counter this replica belongs to.
    pub fn counter_id(&self) -> &I {
        &self.counter_id
    }

    /// Id of this replica.
    pub fn replica_id(&self) -> &R {
        &self.replica_id
    }

    /// Increment this replica's contribution by one.
    pub fn increment(&self) -> Result<()> {
        self.increment_by(1)
    }

    /// Increment this replica's contribution by `delta`.
    ///
    /// Fails with [`Error::Overflow`](crate::Error::Overflow) when the
    /// contribution would no longer fit in a `u64`; nothing is changed then.
    pub fn increment_by(&self, delta: Counter) -> Result<()> {
        if delta == 0 {
            warn!(
                counter = ?self.counter_id,
                replica = ?self.replica_id,
                "ignoring increment by zero"
            );
            return Ok(());
        }
        let mut state = self.state.write();
        state.increment(delta)?;
        trace!(replica = ?self.replica_id, delta, local = state.local(), "incremented");
        Ok(())
    }

    /// Return the current sum of this counter, clamped to `u64::MAX`.
    pub fn value(&self) -> Counter {
        self.state.read().value()
    }

    /// Return the current sum of this counter, or
    /// [`Error::Overflow`](crate::Error::Overflow) if it does not fit in a `u64`.
    pub fn checked_value(&self) -> Result<Counter> {
        self.state.read().checked_value()
    }

    /// This replica's own contribution.
    pub fn local_count(&self) -> Counter {
        self.state.read().local()
    }

    /// Best known count for `replica`.
    pub fn count_for(&self, replica: &R) -> Counter {
        self.state.read().count_for(replica)
    }

    /// A consistent copy of this replica's state, e.g. for shipping to peers.
    pub fn snapshot(&self) -> Snapshot<I, R> {
        self.state.read().clone()
    }

    /// Merge another replica of the same logical counter into this one.
    ///
    /// `other` is only read-locked long enough to copy its state, and that
    /// lock is released before this counter is locked. Merging a counter with
    /// itself is therefore safe; it fails with
    /// [`Error::SelfMerge`](crate::Error::SelfMerge).
    ///
    /// ```
    /// use convergent::{Error, GCounter};
    ///
    /// let a = GCounter::with_initial(1u8, 1u8, 10);
    /// assert_eq!(a.merge(&a), Err(Error::SelfMerge));
    /// assert_eq!(a.value(), 10);
    /// ```
    pub fn merge(&self, other: &GCounter<I, R>) -> Result<()> {
        let theirs = other.snapshot();
        self.merge_snapshot(&theirs)
    }

    /// Merge a state received from another replica.
    ///
    /// Fails without touching this counter when `snapshot` belongs to another
    /// logical counter or carries this replica's id.
    pub fn merge_snapshot(&self, snapshot: &Snapshot<I, R>) -> Result<()> {
        self.state.write().merge(snapshot)?;
        debug!(
            counter = ?self.counter_id,
            replica = ?self.replica_id,
            from = ?snapshot.replica_id(),
            "merged"
        );
        Ok(())
    }
}

impl<I: CounterId, R: Actor> From<Snapshot<I, R>> for GCounter<I, R> {
    fn from(snapshot: Snapshot<I, R>) -> Self {
        GCounter {
            counter_id: snapshot.counter_id().clone(),
            replica_id: snapshot.replica_id().clone(),
            state: RwLock::new(snapshot),
        }
    }
}

impl<I: CounterId, R: Actor> Clone for GCounter<I, R> {
    fn clone(&self) -> Self {
        GCounter::from(self.snapshot())
    }
}

impl<I: CounterId, R: Actor> fmt::Debug for GCounter<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GCounter")
            .field("state", &*self.state.read())
            .finish()
    }
}
