use std::io::Error;

use crate::core::{Observation, Record};
use crate::streams::{RecordStream, ScoredStream};

/// In-memory [`RecordStream`] over a fixed vector of records.
pub struct VecRecordStream<T> {
    pub records: Vec<Record<T>>,
    idx: usize,
}

impl<T> VecRecordStream<T> {
    pub fn new(records: Vec<Record<T>>) -> Self {
        Self { records, idx: 0 }
    }
}

impl<T: Copy> RecordStream<T> for VecRecordStream<T> {
    fn has_more_records(&self) -> bool {
        self.idx < self.records.len()
    }

    fn next_record(&mut self) -> Option<Record<T>> {
        let record = self.records.get(self.idx).copied()?;
        self.idx += 1;
        Some(record)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.idx = 0;
        Ok(())
    }
}

/// In-memory [`ScoredStream`] over a fixed vector of observations.
pub struct VecScoredStream<T> {
    pub observations: Vec<Observation<T>>,
    idx: usize,
}

impl<T> VecScoredStream<T> {
    pub fn new(observations: Vec<Observation<T>>) -> Self {
        Self {
            observations,
            idx: 0,
        }
    }
}

impl<T: Copy> ScoredStream<T> for VecScoredStream<T> {
    fn has_more_records(&self) -> bool {
        self.idx < self.observations.len()
    }

    fn next_observation(&mut self) -> Option<Observation<T>> {
        let observation = self.observations.get(self.idx).copied()?;
        self.idx += 1;
        Some(observation)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.idx = 0;
        Ok(())
    }
}
