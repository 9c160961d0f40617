/// One upstream forecaster in an ensemble: consumes the current actual value
/// and emits its prediction for the next step.
///
/// Implementations may carry state between calls (lag windows, online model
/// parameters); calls arrive in stream order.
pub trait SequencePredictor {
    fn predict_next(&mut self, value: f64) -> f64;
}
