use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::likelihood::error::LikelihoodError;

pub const DEFAULT_PROBATIONARY_PERIOD: u64 = 600;
pub const DEFAULT_LEARNING_PERIOD: u64 = 300;
pub const DEFAULT_REFIT_INTERVAL: u64 = 100;
pub const DEFAULT_AVERAGING_WINDOW: usize = 10;

/// How the reported likelihood is derived from the fitted distribution.
///
/// The two historical conventions are not numerically equivalent; an
/// estimator is built with one mode and keeps it for life.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ScoringMode {
    /// `1 - P(score' >= rawScore)` of the current raw score: values near 1
    /// flag anomalies. Primary convention.
    Probability,
    /// Historical variant: the sustained-alert-filtered tail probability of
    /// the short-term averaged score, reported directly. Values near 0 flag
    /// anomalies, and the log rescaling is applied to the complement.
    Legacy,
}

/// Constructor-time settings for an anomaly-likelihood estimator.
///
/// Build with a struct literal over [`Default::default`]; validation runs
/// when the estimator is constructed (or a snapshot restored), never while
/// scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Calls during which no likelihood judgment is made (neutral 0.5).
    pub probationary_period: u64,
    /// Prefix of history excluded from every fit: the upstream model's own
    /// warm-up, whose scores must not bias the null model.
    pub learning_period: u64,
    /// A full refit runs when `iteration % refit_interval == 0`.
    pub refit_interval: u64,
    /// Short-term moving-average width used by [`ScoringMode::Legacy`].
    pub averaging_window: usize,
    /// Optional bound on retained history. `None` keeps everything (the
    /// historical default); `Some(n)` evicts ring-buffer style.
    pub history_capacity: Option<usize>,
    pub mode: ScoringMode,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            probationary_period: DEFAULT_PROBATIONARY_PERIOD,
            learning_period: DEFAULT_LEARNING_PERIOD,
            refit_interval: DEFAULT_REFIT_INTERVAL,
            averaging_window: DEFAULT_AVERAGING_WINDOW,
            history_capacity: None,
            mode: ScoringMode::Probability,
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<(), LikelihoodError> {
        if self.probationary_period < self.learning_period {
            return Err(LikelihoodError::Configuration(format!(
                "probationary_period ({}) must be >= learning_period ({})",
                self.probationary_period, self.learning_period
            )));
        }
        if self.refit_interval == 0 {
            return Err(LikelihoodError::Configuration(
                "refit_interval must be > 0".into(),
            ));
        }
        if self.averaging_window == 0 {
            return Err(LikelihoodError::Configuration(
                "averaging_window must be > 0".into(),
            ));
        }
        if let Some(capacity) = self.history_capacity {
            let floor = (self.refit_interval as usize).max(self.averaging_window);
            if capacity < floor {
                return Err(LikelihoodError::Configuration(format!(
                    "history_capacity ({capacity}) must cover at least one refit \
                     interval and the averaging window ({floor})"
                )));
            }
        }
        Ok(())
    }
}
