mod record;

pub use record::{Observation, Record};
