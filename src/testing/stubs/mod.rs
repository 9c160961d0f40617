pub mod counting_fitter;
pub mod predictors;
pub mod scripted_prompts;
pub mod scripted_scorer;
pub mod vec_streams;

pub use counting_fitter::{CountingFitter, FitCounter};
pub use predictors::{ConstantPredictor, EchoPredictor, OffsetPredictor};
pub use scripted_prompts::{Answer, ScriptedPrompts};
pub use scripted_scorer::ScriptedScorer;
pub use vec_streams::{VecRecordStream, VecScoredStream};
