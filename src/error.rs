use std::result;

use thiserror::Error;

/// Result alias to reduce redundancy in function return types
pub(crate) type Result<T> = result::Result<T, Error>;

/// Alias kept for callers that only deal with merges.
pub type MergeError = Error;

/// Possible counter error codes
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The two states belong to different logical counters.
    ///
    /// The merge is dropped and the target is left as it was.
    #[error("cannot merge states of different logical counters")]
    MismatchedCounter,

    /// The two states claim the same replica id.
    ///
    /// This covers merging a counter into itself as well as merging a
    /// separate state that reports this replica's id. Either way it points
    /// at broken replica bookkeeping in the caller.
    #[error("cannot merge a state carrying this replica's own id")]
    SelfMerge,

    /// An increment, or the total of all replica counts, does not fit in a `u64`.
    #[error("counter overflowed u64")]
    Overflow,
}
