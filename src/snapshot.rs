use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::traits::CvRDT;
use crate::vclock::{Actor, Counter, CounterId, VClock};

/// `Snapshot` is the plain state of one replica of a grow-only counter.
///
/// It carries the replica's own contribution (`local`) and the last known
/// contributions of every other replica it has merged with (`peers`). The
/// value of the counter is the sum over both, with `local` standing in for
/// this replica's slot.
///
/// A `Snapshot` is what a transport ships between replicas. It derives serde
/// traits and leaves the encoding to the caller.
///
/// # Examples
///
/// ```
/// use convergent::{CvRDT, Snapshot};
///
/// let mut a = Snapshot::new(1u64, 'a', 10);
/// let b = Snapshot::new(1u64, 'b', 7);
///
/// a.merge(&b).unwrap();
/// assert_eq!(a.value(), 17);
/// assert_eq!(a.local(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound(deserialize = ""), from = "RawSnapshot<I, R>")]
pub struct Snapshot<I: CounterId, R: Actor> {
    counter_id: I,
    replica_id: R,
    local: Counter,
    peers: VClock<R>,
}

/// Wire form of a `Snapshot`, before its peer view is checked.
#[derive(Deserialize)]
#[serde(bound(deserialize = ""))]
struct RawSnapshot<I: CounterId, R: Actor> {
    counter_id: I,
    replica_id: R,
    local: Counter,
    peers: VClock<R>,
}

impl<I: CounterId, R: Actor> From<RawSnapshot<I, R>> for Snapshot<I, R> {
    /// `peers` never holds our own slot; `local` is authoritative for it.
    fn from(raw: RawSnapshot<I, R>) -> Self {
        let mut peers = raw.peers;
        peers.forget(&raw.replica_id);
        Snapshot {
            counter_id: raw.counter_id,
            replica_id: raw.replica_id,
            local: raw.local,
            peers,
        }
    }
}

impl<I: CounterId, R: Actor> Snapshot<I, R> {
    /// A state with no knowledge of any peer.
    pub fn new(counter_id: I, replica_id: R, local: Counter) -> Self {
        Snapshot {
            counter_id,
            replica_id,
            local,
            peers: VClock::new(),
        }
    }

    /// Id of the logical counter this state belongs to.
    pub fn counter_id(&self) -> &I {
        &self.counter_id
    }

    /// Id of the replica that owns this state.
    pub fn replica_id(&self) -> &R {
        &self.replica_id
    }

    /// This replica's own contribution.
    pub fn local(&self) -> Counter {
        self.local
    }

    /// Last known contributions of the other replicas.
    pub fn peers(&self) -> &VClock<R> {
        &self.peers
    }

    /// Best known count for `replica`.
    pub fn count_for(&self, replica: &R) -> Counter {
        if *replica == self.replica_id {
            self.local
        } else {
            self.peers.get(replica)
        }
    }

    /// This replica's knowledge of every replica, itself included.
    pub fn full_view(&self) -> VClock<R> {
        let mut view = self.peers.clone();
        view.witness(self.replica_id.clone(), self.local);
        view
    }

    /// Sum of every replica's best known count, clamped to `u64::MAX`.
    pub fn value(&self) -> Counter {
        self.full_view().saturating_sum()
    }

    /// Sum of every replica's best known count.
    ///
    /// Fails with [`Error::Overflow`] when the sum does not fit in a `u64`.
    pub fn checked_value(&self) -> Result<Counter> {
        self.full_view().checked_sum().ok_or(Error::Overflow)
    }

    /// Add `delta` to this replica's contribution.
    ///
    /// On overflow the state is left untouched and [`Error::Overflow`] is returned.
    pub fn increment(&mut self, delta: Counter) -> Result<()> {
        match self.local.checked_add(delta) {
            Some(local) => {
                self.local = local;
                Ok(())
            }
            None => {
                warn!(
                    counter = ?self.counter_id,
                    replica = ?self.replica_id,
                    local = self.local,
                    delta,
                    "increment would overflow"
                );
                Err(Error::Overflow)
            }
        }
    }

    /// Check that `other` may be merged into `self`.
    pub fn validate_merge(&self, other: &Self) -> Result<()> {
        if self.counter_id != other.counter_id {
            warn!(
                counter = ?self.counter_id,
                other_counter = ?other.counter_id,
                replica = ?self.replica_id,
                "refusing merge of a different logical counter"
            );
            return Err(Error::MismatchedCounter);
        }
        if self.replica_id == other.replica_id {
            warn!(
                counter = ?self.counter_id,
                replica = ?self.replica_id,
                "refusing merge with a state carrying our own replica id"
            );
            return Err(Error::SelfMerge);
        }
        Ok(())
    }
}

impl<I: CounterId, R: Actor> CvRDT for Snapshot<I, R> {
    /// Fold `other`'s full view into our peer view.
    ///
    /// Our own slot is never written by a merge: `local` stays authoritative
    /// and the merged view drops our id before it is stored.
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.validate_merge(other)?;

        let mut merged = self.full_view();
        merged.merge(&other.full_view());
        merged.forget(&self.replica_id);

        self.peers = merged;
        Ok(())
    }
}
