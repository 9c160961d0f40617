use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::Observation;

/// Ordered history of scored observations.
///
/// Arrival order equals timestamp order (the estimator enforces this before
/// pushing). With a capacity set, the oldest entries are evicted ring-buffer
/// style; `start_index` reports how many were dropped, so positions keep
/// meaning as global indices even after eviction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreHistory<T> {
    entries: VecDeque<Observation<T>>,
    capacity: Option<usize>,
    evicted: u64,
}

impl<T> ScoreHistory<T> {
    pub fn new(capacity: Option<usize>) -> Self {
        let entries = match capacity {
            Some(c) => VecDeque::with_capacity(c),
            None => VecDeque::new(),
        };
        Self {
            entries,
            capacity,
            evicted: 0,
        }
    }

    pub fn push(&mut self, observation: Observation<T>) {
        if let Some(capacity) = self.capacity {
            while self.entries.len() >= capacity && !self.entries.is_empty() {
                self.entries.pop_front();
                self.evicted += 1;
            }
        }
        self.entries.push_back(observation);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Global index of the oldest retained observation.
    #[inline]
    pub fn start_index(&self) -> u64 {
        self.evicted
    }

    /// Total observations ever pushed, retained or not.
    #[inline]
    pub fn total_recorded(&self) -> u64 {
        self.evicted + self.entries.len() as u64
    }

    #[inline]
    pub fn last(&self) -> Option<&Observation<T>> {
        self.entries.back()
    }

    /// Raw scores of every retained observation, in arrival order.
    pub fn raw_scores(&self) -> Vec<f64> {
        self.entries.iter().map(|o| o.raw_score).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation<T>> {
        self.entries.iter()
    }
}
