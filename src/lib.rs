//! A thread-safe, state-based grow-only counter.
//!
//! A [grow-only counter][gcounter] (G-Counter) is a
//! [Conflict-free Replicated Data Type][crdt]: every replica counts its own
//! increments, and replicas reconcile by exchanging state and keeping the
//! largest known count for every replica. The value of the counter is the sum
//! of those per-replica maxima. No coordination is needed for replicas to
//! converge.
//!
//! [`GCounter`] is one replica, safe to share between threads. [`Snapshot`]
//! is the plain, serializable state that replicas exchange.
//!
//! ```
//! use convergent::GCounter;
//!
//! let r1 = GCounter::with_initial(1u64, 1u64, 10);
//! let r2 = GCounter::with_initial(1u64, 2u64, 7);
//!
//! r1.merge(&r2).unwrap();
//! assert_eq!(r1.value(), 17);
//!
//! for _ in 0..5 {
//!     r2.increment().unwrap();
//! }
//! r1.merge(&r2).unwrap();
//! assert_eq!(r1.value(), 22);
//! ```
//!
//! [crdt]: https://en.wikipedia.org/wiki/Conflict-free_replicated_data_type
//! [gcounter]: https://en.wikipedia.org/wiki/Conflict-free_replicated_data_type#G-Counter_(Grow-only_Counter)
#![deny(missing_docs)]

mod error;
pub use crate::error::{Error, MergeError};

mod traits;
pub use crate::traits::CvRDT;

/// This module contains the replica → count map used for peer views.
pub mod vclock;

/// This module contains the exchangeable state of a counter replica.
pub mod snapshot;

/// This module contains the thread-safe Grow-only Counter.
pub mod gcounter;

// Top-level re-exports for counter structures.
pub use crate::{
    gcounter::GCounter,
    snapshot::Snapshot,
    vclock::{Actor, Counter, CounterId, VClock},
};
