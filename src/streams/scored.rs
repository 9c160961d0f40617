use std::io::Error;

use crate::core::Observation;
use crate::scorers::AnomalyScorer;
use crate::streams::stream::{RecordStream, ScoredStream};

/// Couples a [`RecordStream`] to an [`AnomalyScorer`], yielding scored
/// observations ready for calibration. Restarting restarts both halves.
pub struct ModelScoredStream<T> {
    stream: Box<dyn RecordStream<T>>,
    scorer: Box<dyn AnomalyScorer<T>>,
}

impl<T> ModelScoredStream<T> {
    pub fn new(stream: Box<dyn RecordStream<T>>, scorer: Box<dyn AnomalyScorer<T>>) -> Self {
        Self { stream, scorer }
    }
}

impl<T> ScoredStream<T> for ModelScoredStream<T> {
    fn has_more_records(&self) -> bool {
        self.stream.has_more_records()
    }

    fn next_observation(&mut self) -> Option<Observation<T>> {
        let record = self.stream.next_record()?;
        let raw_score = self.scorer.score_record(&record);
        Some(Observation::new(record.timestamp, record.value, raw_score))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.scorer.reset();
        self.stream.restart()
    }
}
