pub mod stubs;

pub use stubs::{
    Answer, ConstantPredictor, CountingFitter, EchoPredictor, FitCounter, OffsetPredictor,
    ScriptedPrompts, ScriptedScorer, VecRecordStream, VecScoredStream,
};
