use std::cell::Cell;
use std::rc::Rc;

use crate::likelihood::{DistributionFitter, LikelihoodError, ScoreDistribution};

/// Shared handle onto a [`CountingFitter`]'s call count, usable after the
/// fitter itself has been boxed away into an estimator.
pub struct FitCounter(Rc<Cell<u64>>);

impl FitCounter {
    pub fn count(&self) -> u64 {
        self.0.get()
    }
}

/// Wraps another fitter and counts every fit attempt, for pinning down
/// refit cadence in tests.
pub struct CountingFitter<F> {
    inner: F,
    count: Rc<Cell<u64>>,
}

impl<F: DistributionFitter> CountingFitter<F> {
    pub fn wrapping(inner: F) -> (Self, FitCounter) {
        let count = Rc::new(Cell::new(0));
        (
            Self {
                inner,
                count: Rc::clone(&count),
            },
            FitCounter(count),
        )
    }
}

impl<F: DistributionFitter> DistributionFitter for CountingFitter<F> {
    fn fit(&self, scores: &[f64], skip: usize) -> Result<ScoreDistribution, LikelihoodError> {
        self.count.set(self.count.get() + 1);
        self.inner.fit(scores, skip)
    }
}
