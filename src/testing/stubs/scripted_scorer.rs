use crate::core::Record;
use crate::scorers::AnomalyScorer;

/// Plays back a prescribed raw-score sequence, standing in for the upstream
/// sequence model. Past the end of the script every record scores 0.0.
pub struct ScriptedScorer {
    scores: Vec<f64>,
    next: usize,
}

impl ScriptedScorer {
    pub fn new(scores: Vec<f64>) -> Self {
        Self { scores, next: 0 }
    }
}

impl<T> AnomalyScorer<T> for ScriptedScorer {
    fn score_record(&mut self, _record: &Record<T>) -> f64 {
        let score = self.scores.get(self.next).copied().unwrap_or(0.0);
        self.next += 1;
        score
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}
