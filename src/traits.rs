use crate::error::Result;

/// State based CRDT's replicate by transmitting the entire CRDT state.
///
/// Unlike a plain join, a merge here may refuse its input: the implementor
/// checks its preconditions first and must leave `self` untouched when it
/// returns an error.
pub trait CvRDT {
    /// Merge the given CRDT state into the current CRDT.
    ///
    /// Accepted merges must be commutative, associative and idempotent.
    fn merge(&mut self, other: &Self) -> Result<()>;
}
