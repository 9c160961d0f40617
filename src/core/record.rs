use serde::{Deserialize, Serialize};

/// One un-scored input record: what the upstream sequence model consumes.
///
/// `T` is any ordered-comparable timestamp: wall-clock datetimes for file
/// data, plain numeric indices for synthetic streams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub timestamp: T,
    pub value: f64,
}

impl<T> Record<T> {
    #[inline]
    pub fn new(timestamp: T, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A record together with the raw anomaly score the upstream model produced
/// for it. Immutable once recorded; the estimator never reorders these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation<T> {
    pub timestamp: T,
    pub value: f64,
    /// Instantaneous surprise reported upstream, nominally in `[0, 1]`.
    /// Out-of-range values are accepted as-is; the math stays defined.
    pub raw_score: f64,
}

impl<T> Observation<T> {
    #[inline]
    pub fn new(timestamp: T, value: f64, raw_score: f64) -> Self {
        Self {
            timestamp,
            value,
            raw_score,
        }
    }

    #[inline]
    pub fn record(&self) -> Record<T>
    where
        T: Copy,
    {
        Record::new(self.timestamp, self.value)
    }
}
