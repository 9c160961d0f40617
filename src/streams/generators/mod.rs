mod sine;

pub use sine::{PhaseAnomaly, SineGenerator};
