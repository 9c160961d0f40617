use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Sustained-alert filter thresholds (historical constants). A tail value at
/// or below `ALERT_FLOOR` that directly follows a filtered value at or below
/// the floor is reported as `POST_ALERT_TAIL`, so a sustained extreme run
/// does not stay pinned at the extreme.
pub const ALERT_FLOOR: f64 = 1e-5;
pub const POST_ALERT_TAIL: f64 = 1e-3;

/// Rolling short-term state used by legacy scoring: a moving average of the
/// most recent raw scores plus the previous filtered tail value.
///
/// Lives beside the fitted distribution, not inside it: the distribution
/// stays an immutable value while this tracker mutates every call, and it is
/// carried across refits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortTermTracker {
    window: VecDeque<f64>,
    window_size: usize,
    total: f64,
    last_filtered: Option<f64>,
}

impl ShortTermTracker {
    pub fn new(window_size: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(window_size + 1),
            window_size,
            total: 0.0,
            last_filtered: None,
        }
    }

    #[inline]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Pushes a raw score and returns the updated short-term average.
    pub fn update_average(&mut self, raw_score: f64) -> f64 {
        self.window.push_back(raw_score);
        self.total += raw_score;
        if self.window.len() > self.window_size {
            if let Some(evicted) = self.window.pop_front() {
                self.total -= evicted;
            }
        }
        self.total / self.window.len() as f64
    }

    /// Applies the sustained-alert filter to a fresh tail probability.
    pub fn filter_tail(&mut self, tail: f64) -> f64 {
        let filtered = match self.last_filtered {
            Some(previous) if tail <= ALERT_FLOOR && previous <= ALERT_FLOOR => POST_ALERT_TAIL,
            _ => tail,
        };
        self.last_filtered = Some(filtered);
        filtered
    }
}
