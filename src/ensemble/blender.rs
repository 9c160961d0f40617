use std::io::{Error, ErrorKind};

use tracing::{debug, warn};

use crate::ensemble::lstsq::solve_least_squares;
use crate::ensemble::predictor::SequencePredictor;

/// Rolling design-window rows kept for the weight fit.
pub const DEFAULT_WINDOW_ROWS: usize = 2000;
/// Records between weight refits once past warm-up (a week of hourly data).
pub const DEFAULT_REFIT_EVERY: u64 = 168;
/// Records the upstream predictors get to settle before their output is
/// trusted for fitting.
pub const DEFAULT_WARMUP_RECORDS: u64 = 300;

/// Both combinations of the ensemble's fresh next-step predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendedPrediction {
    /// Plain uniform average.
    pub mean: f64,
    /// Weighted by the current least-squares fit (uniform until the first
    /// successful refit).
    pub blended: f64,
}

/// Least-squares blend of several next-step predictors.
///
/// Each [`advance`](Self::advance) call aligns the predictions made on the
/// previous call with the actual value that has now arrived, keeps the pair
/// in a bounded rolling design window, and periodically refits the blend
/// weights over that window. Weights start uniform at `1/k` and stay in
/// place whenever a refit is skipped or singular.
pub struct EnsembleBlender {
    predictors: Vec<Box<dyn SequencePredictor>>,
    weights: Vec<f64>,
    window_rows: usize,
    refit_every: u64,
    warmup_records: u64,
    design: Vec<Vec<f64>>,
    targets: Vec<f64>,
    next_slot: usize,
    pending: Option<Vec<f64>>,
    processed: u64,
    refits: u64,
}

impl EnsembleBlender {
    pub fn new(predictors: Vec<Box<dyn SequencePredictor>>) -> Result<Self, Error> {
        Self::with_options(
            predictors,
            DEFAULT_WINDOW_ROWS,
            DEFAULT_REFIT_EVERY,
            DEFAULT_WARMUP_RECORDS,
        )
    }

    pub fn with_options(
        predictors: Vec<Box<dyn SequencePredictor>>,
        window_rows: usize,
        refit_every: u64,
        warmup_records: u64,
    ) -> Result<Self, Error> {
        if predictors.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Ensemble needs at least one predictor",
            ));
        }
        if window_rows == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "window_rows must be > 0",
            ));
        }
        if refit_every == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "refit_every must be > 0",
            ));
        }

        let count = predictors.len();
        Ok(Self {
            predictors,
            weights: vec![1.0 / count as f64; count],
            window_rows,
            refit_every,
            warmup_records,
            design: Vec::new(),
            targets: Vec::new(),
            next_slot: 0,
            pending: None,
            processed: 0,
            refits: 0,
        })
    }

    /// Feeds the actual value for the current step and returns the
    /// combinations of the predictions for the next one.
    pub fn advance(&mut self, actual: f64) -> BlendedPrediction {
        if let Some(previous) = self.pending.take() {
            self.record_pair(previous, actual);
        }
        self.processed += 1;

        if self.refit_due() {
            self.refit_weights();
        }

        let predictions: Vec<f64> = self
            .predictors
            .iter_mut()
            .map(|p| p.predict_next(actual))
            .collect();

        let mean = predictions.iter().sum::<f64>() / predictions.len() as f64;
        let blended = predictions
            .iter()
            .zip(&self.weights)
            .map(|(p, w)| p * w)
            .sum();

        self.pending = Some(predictions);
        BlendedPrediction { mean, blended }
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Successful weight refits so far.
    #[inline]
    pub fn refit_count(&self) -> u64 {
        self.refits
    }

    #[inline]
    pub fn processed(&self) -> u64 {
        self.processed
    }

    fn record_pair(&mut self, predictions: Vec<f64>, actual: f64) {
        if self.design.len() < self.window_rows {
            self.design.push(predictions);
            self.targets.push(actual);
        } else {
            self.design[self.next_slot] = predictions;
            self.targets[self.next_slot] = actual;
        }
        self.next_slot = (self.next_slot + 1) % self.window_rows;
    }

    fn refit_due(&self) -> bool {
        self.design.len() == self.window_rows
            && self.processed > self.warmup_records + self.window_rows as u64
            && self.processed % self.refit_every == 0
    }

    fn refit_weights(&mut self) {
        match solve_least_squares(&self.design, &self.targets, self.predictors.len()) {
            Some(weights) => {
                self.refits += 1;
                debug!(
                    processed = self.processed,
                    rows = self.design.len(),
                    ?weights,
                    "refit blend weights"
                );
                self.weights = weights;
            }
            None => {
                warn!(
                    processed = self.processed,
                    "singular normal matrix; keeping previous blend weights"
                );
            }
        }
    }
}
