mod blender;
mod lstsq;
mod predictor;

pub use blender::{
    BlendedPrediction, DEFAULT_REFIT_EVERY, DEFAULT_WARMUP_RECORDS, DEFAULT_WINDOW_ROWS,
    EnsembleBlender,
};
pub use lstsq::solve_least_squares;
pub use predictor::SequencePredictor;
