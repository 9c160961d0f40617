mod config;
mod distribution;
mod error;
mod estimator;
mod history;
mod short_term;

pub use config::{
    DEFAULT_AVERAGING_WINDOW, DEFAULT_LEARNING_PERIOD, DEFAULT_PROBATIONARY_PERIOD,
    DEFAULT_REFIT_INTERVAL, EstimatorConfig, ScoringMode,
};
pub use distribution::{
    DistributionFitter, GaussianMomentFitter, MEAN_LOWER_BOUND, ScoreDistribution,
    VARIANCE_LOWER_BOUND,
};
pub use error::LikelihoodError;
pub use estimator::{
    AnomalyLikelihood, EstimatorSnapshot, LikelihoodScore, NEUTRAL_LIKELIHOOD, log_scale,
};
pub use history::ScoreHistory;
pub use short_term::{ALERT_FLOOR, POST_ALERT_TAIL, ShortTermTracker};
