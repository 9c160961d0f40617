use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

use crate::likelihood::ScoringMode;

/// Everything the calibrate task needs to run, whether it came from the
/// wizard or from command-line flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrateParams {
    /// Scored CSV to read (`timestamp,value,anomaly_score`).
    pub input: PathBuf,
    /// CSV the likelihood columns are written to.
    pub output: PathBuf,

    pub probationary_period: u64,
    pub learning_period: u64,
    pub refit_interval: u64,
    pub averaging_window: u64,
    #[serde(default)]
    pub history_capacity: Option<u64>,
    pub mode: ScoringMode,

    #[serde(default)]
    pub max_records: Option<u64>,
    pub sample_frequency: u64,

    /// Resume from a previously saved estimator snapshot.
    #[serde(default)]
    pub snapshot_in: Option<PathBuf>,
    /// Save the estimator state here after the run.
    #[serde(default)]
    pub snapshot_out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnomalyParams {
    /// Record index the phase-window anomaly becomes active at.
    pub start_index: u64,
    /// Offset added to the signal inside the window.
    pub magnitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateParams {
    pub output: PathBuf,
    pub records: u64,
    pub noise_amplitude: f64,
    #[serde(default)]
    pub anomaly: Option<AnomalyParams>,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(TaskKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum TaskChoice {
    #[strum_discriminants(strum(
        message = "Calibrate",
        detailed_message = "Turn a scored CSV into anomaly likelihoods."
    ))]
    Calibrate(CalibrateParams),
    #[strum_discriminants(strum(
        message = "Generate",
        detailed_message = "Write a synthetic noisy-sine dataset to CSV."
    ))]
    Generate(GenerateParams),
}
