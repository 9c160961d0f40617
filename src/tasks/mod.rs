mod calibration_runner;
mod dataset_export;
mod labeling;

use thiserror::Error;

pub use calibration_runner::{CalibrationRunner, CalibrationSnapshot, RunSummary};
pub use dataset_export::DatasetExporter;
pub use labeling::{DEFAULT_LOG_THRESHOLD, LabeledWindows, ThresholdLabeler};

/// Failure of a pipeline task. The estimator absorbs fit warnings itself, so
/// this surfaces only I/O trouble and hard estimator errors (out-of-order
/// input, bad configuration).
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Likelihood(#[from] crate::likelihood::LikelihoodError),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
