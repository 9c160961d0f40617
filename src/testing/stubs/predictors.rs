use crate::ensemble::SequencePredictor;

/// Predicts the same value forever.
pub struct ConstantPredictor {
    value: f64,
}

impl ConstantPredictor {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl SequencePredictor for ConstantPredictor {
    fn predict_next(&mut self, _value: f64) -> f64 {
        self.value
    }
}

/// Predicts that the next value equals the current one.
#[derive(Default)]
pub struct EchoPredictor;

impl EchoPredictor {
    pub fn new() -> Self {
        Self
    }
}

impl SequencePredictor for EchoPredictor {
    fn predict_next(&mut self, value: f64) -> f64 {
        value
    }
}

/// Predicts the current value plus a fixed offset, which is exact on any
/// series with a constant step.
pub struct OffsetPredictor {
    offset: f64,
}

impl OffsetPredictor {
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }
}

impl SequencePredictor for OffsetPredictor {
    fn predict_next(&mut self, value: f64) -> f64 {
        value + self.offset
    }
}
