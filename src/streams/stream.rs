use std::io::Error;

use crate::core::{Observation, Record};

/// Pull-based interface for sources of un-scored, timestamped records.
///
/// Implementations may represent finite datasets (e.g., files) or unbounded
/// generators. Timestamps must be non-decreasing in yield order.
pub trait RecordStream<T> {
    /// Indicates whether the stream *may* produce more records.
    ///
    /// Finite streams should return `false` once exhausted. Unbounded
    /// generators typically return `true` always. This call should be cheap
    /// and side effect free; if it returns `false`, a subsequent call to
    /// [`next_record`](Self::next_record) must return `None`.
    fn has_more_records(&self) -> bool;

    /// Produces the next record, or `None` if the stream is exhausted.
    ///
    /// Implementations should not panic on normal end-of-stream conditions.
    /// Sources that can contain malformed rows may skip them and continue,
    /// or end the stream early.
    fn next_record(&mut self) -> Option<Record<T>>;

    /// Resets the stream to its initial state.
    ///
    /// For file-backed streams this reopens or seeks back to the first data
    /// row; for generators it re-seeds the RNG and clears internal counters.
    ///
    /// Returns an error if the underlying source cannot be reopened.
    fn restart(&mut self) -> Result<(), Error>;
}

/// Pull-based interface for sources of already-scored observations, the
/// direct input of calibration. Same contract as [`RecordStream`], with the
/// raw anomaly score attached to every row.
pub trait ScoredStream<T> {
    fn has_more_records(&self) -> bool;

    fn next_observation(&mut self) -> Option<Observation<T>>;

    fn restart(&mut self) -> Result<(), Error>;
}
