use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::Observation;
use crate::likelihood::config::{EstimatorConfig, ScoringMode};
use crate::likelihood::distribution::{DistributionFitter, GaussianMomentFitter, ScoreDistribution};
use crate::likelihood::error::LikelihoodError;
use crate::likelihood::history::ScoreHistory;
use crate::likelihood::short_term::ShortTermTracker;

/// Additive guard keeping `log(0)` out of the rescaling when likelihood
/// reaches 1.0, and the matching divisor (`log(1.0 - 0.9999999999)` as
/// evaluated in doubles). Exact calibration constants: downstream thresholds
/// assume this precise scale, so neither may be rounded or refactored.
const LOG_GUARD: f64 = 1.0000000001;
const LOG_DIVISOR: f64 = -23.02585084720009;

/// Likelihood reported while no judgment can be made: during probation, and
/// before any fit has ever succeeded. Reserved for those two cases only,
/// never substituted for an error.
pub const NEUTRAL_LIKELIHOOD: f64 = 0.5;

/// Maps a likelihood onto the log alert axis.
///
/// Likelihoods crowd asymptotically against 1.0 (0.99999 vs 0.999999 is a
/// meaningful difference); this rescaling spreads that crowded region onto a
/// roughly linear scale with `log_scale(1.0) == 1.0`, suitable for fixed
/// thresholds.
#[inline]
pub fn log_scale(likelihood: f64) -> f64 {
    (LOG_GUARD - likelihood).ln() / LOG_DIVISOR
}

/// One calibrated score pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LikelihoodScore {
    pub likelihood: f64,
    pub log_likelihood: f64,
}

impl LikelihoodScore {
    fn neutral() -> Self {
        Self {
            likelihood: NEUTRAL_LIKELIHOOD,
            log_likelihood: log_scale(NEUTRAL_LIKELIHOOD),
        }
    }
}

/// Streaming anomaly-likelihood estimator.
///
/// Calibrates the raw anomaly scores of one data stream into likelihoods by
/// fitting a null distribution over the stream's own recent scores. One
/// instance per independent stream; calls must arrive in timestamp order and
/// the caller serializes access (the estimator itself is single-threaded
/// sequential state).
///
/// The expensive full fit runs only at refit boundaries; every other call is
/// an O(1) evaluation against the currently held distribution.
pub struct AnomalyLikelihood<T> {
    config: EstimatorConfig,
    fitter: Box<dyn DistributionFitter>,
    history: ScoreHistory<T>,
    iteration: u64,
    distribution: Option<ScoreDistribution>,
    short_term: ShortTermTracker,
    refits: u64,
    last_fit_failure: Option<LikelihoodError>,
}

impl<T: Copy + PartialOrd + Debug> AnomalyLikelihood<T> {
    pub fn new(config: EstimatorConfig) -> Result<Self, LikelihoodError> {
        Self::with_fitter(config, Box::new(GaussianMomentFitter))
    }

    /// Swaps in a non-default fitter (alternative null models, or the
    /// counting wrapper used to verify refit cadence).
    pub fn with_fitter(
        config: EstimatorConfig,
        fitter: Box<dyn DistributionFitter>,
    ) -> Result<Self, LikelihoodError> {
        config.validate()?;
        Ok(Self {
            history: ScoreHistory::new(config.history_capacity),
            short_term: ShortTermTracker::new(config.averaging_window),
            config,
            fitter,
            iteration: 0,
            distribution: None,
            refits: 0,
            last_fit_failure: None,
        })
    }

    /// Calibrates one observation.
    ///
    /// Probation calls return the neutral likelihood; afterwards the raw
    /// score is judged against the fitted null model, refitting first when a
    /// boundary is due. The observation is recorded and the iteration
    /// counter advanced before returning, so the just-scored point feeds the
    /// next refit.
    ///
    /// A timestamp earlier than the latest recorded one is rejected with
    /// [`LikelihoodError::OutOfOrder`] and leaves all state untouched.
    pub fn score(
        &mut self,
        timestamp: T,
        value: f64,
        raw_score: f64,
    ) -> Result<LikelihoodScore, LikelihoodError> {
        if let Some(last) = self.history.last() {
            if timestamp < last.timestamp {
                return Err(LikelihoodError::OutOfOrder {
                    latest: format!("{:?}", last.timestamp),
                    offered: format!("{timestamp:?}"),
                });
            }
        }

        // The short-term average tracks every call one-to-one, probation
        // included, so legacy evaluation starts from a warm window.
        let average = self.short_term.update_average(raw_score);

        let result = if self.iteration < self.config.probationary_period {
            LikelihoodScore::neutral()
        } else {
            if self.refit_due() {
                self.refit();
            }
            self.evaluate(raw_score, average)
        };

        self.history
            .push(Observation::new(timestamp, value, raw_score));
        self.iteration += 1;
        Ok(result)
    }

    #[inline]
    fn refit_due(&self) -> bool {
        self.distribution.is_none() || self.iteration % self.config.refit_interval == 0
    }

    /// Full re-estimation over the retained history, excluding the
    /// learning-period prefix (by global index, so eviction never
    /// double-skips). On failure the previous distribution stays in place.
    fn refit(&mut self) {
        let scores = self.history.raw_scores();
        let skip = self
            .config
            .learning_period
            .saturating_sub(self.history.start_index()) as usize;

        match self.fitter.fit(&scores, skip) {
            Ok(distribution) => {
                self.refits += 1;
                self.last_fit_failure = None;
                debug!(
                    iteration = self.iteration,
                    samples = distribution.sample_size,
                    mean = distribution.mean,
                    variance = distribution.variance,
                    "refit score distribution"
                );
                self.distribution = Some(distribution);
            }
            Err(error) => {
                warn!(
                    iteration = self.iteration,
                    %error,
                    "distribution fit failed; keeping previous model"
                );
                self.last_fit_failure = Some(error);
            }
        }
    }

    fn evaluate(&mut self, raw_score: f64, average: f64) -> LikelihoodScore {
        let Some(distribution) = self.distribution else {
            // Every fit so far has failed; the neutral value is the
            // documented fallback until one succeeds.
            return LikelihoodScore::neutral();
        };

        match self.config.mode {
            ScoringMode::Probability => {
                let likelihood = 1.0 - distribution.tail_probability(raw_score);
                LikelihoodScore {
                    likelihood,
                    log_likelihood: log_scale(likelihood),
                }
            }
            ScoringMode::Legacy => {
                let tail = distribution.tail_probability(average);
                let filtered = self.short_term.filter_tail(tail);
                LikelihoodScore {
                    likelihood: filtered,
                    log_likelihood: log_scale(1.0 - filtered),
                }
            }
        }
    }

    #[inline]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    #[inline]
    pub fn in_probation(&self) -> bool {
        self.iteration < self.config.probationary_period
    }

    #[inline]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    #[inline]
    pub fn distribution(&self) -> Option<&ScoreDistribution> {
        self.distribution.as_ref()
    }

    /// Successful refits so far.
    #[inline]
    pub fn refit_count(&self) -> u64 {
        self.refits
    }

    /// The failure retained from the most recent unsuccessful refit, cleared
    /// by the next successful one.
    #[inline]
    pub fn last_fit_failure(&self) -> Option<&LikelihoodError> {
        self.last_fit_failure.as_ref()
    }

    pub fn history(&self) -> &ScoreHistory<T> {
        &self.history
    }

    /// Opaque checkpoint of the full calibration state. Restoring it resumes
    /// the stream without replaying history.
    pub fn snapshot(&self) -> EstimatorSnapshot<T> {
        EstimatorSnapshot {
            config: self.config.clone(),
            iteration: self.iteration,
            history: self.history.clone(),
            distribution: self.distribution,
            short_term: self.short_term.clone(),
            refits: self.refits,
        }
    }

    pub fn restore(snapshot: EstimatorSnapshot<T>) -> Result<Self, LikelihoodError> {
        Self::restore_with_fitter(snapshot, Box::new(GaussianMomentFitter))
    }

    pub fn restore_with_fitter(
        snapshot: EstimatorSnapshot<T>,
        fitter: Box<dyn DistributionFitter>,
    ) -> Result<Self, LikelihoodError> {
        snapshot.config.validate()?;
        if snapshot.iteration != snapshot.history.total_recorded() {
            return Err(LikelihoodError::Configuration(format!(
                "snapshot iteration count ({}) does not match its history ({})",
                snapshot.iteration,
                snapshot.history.total_recorded()
            )));
        }
        if snapshot.history.capacity() != snapshot.config.history_capacity {
            return Err(LikelihoodError::Configuration(
                "snapshot history capacity does not match its configuration".into(),
            ));
        }
        if snapshot.short_term.window_size() != snapshot.config.averaging_window {
            return Err(LikelihoodError::Configuration(
                "snapshot averaging window does not match its configuration".into(),
            ));
        }
        Ok(Self {
            config: snapshot.config,
            fitter,
            history: snapshot.history,
            iteration: snapshot.iteration,
            distribution: snapshot.distribution,
            short_term: snapshot.short_term,
            refits: snapshot.refits,
            last_fit_failure: None,
        })
    }
}

/// Serializable checkpoint of an estimator (see
/// [`AnomalyLikelihood::snapshot`]). Opaque to callers: hosts store and
/// transport it, they do not interpret it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorSnapshot<T> {
    pub config: EstimatorConfig,
    pub iteration: u64,
    pub history: ScoreHistory<T>,
    pub distribution: Option<ScoreDistribution>,
    pub short_term: ShortTermTracker,
    pub refits: u64,
}
