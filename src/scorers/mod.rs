use crate::core::Record;

/// Boundary to the upstream sequence model that produces raw anomaly scores.
///
/// Records arrive in stream order and the scorer may carry state between
/// calls. Scores are conventionally in `[0, 1]` but are passed downstream
/// untouched either way.
pub trait AnomalyScorer<T> {
    fn score_record(&mut self, record: &Record<T>) -> f64;

    /// Returns the scorer to its initial state, forgetting everything
    /// learned from previous records.
    fn reset(&mut self);
}
