/// Historical default alert threshold on the log axis, reached at a
/// likelihood of roughly five nines.
pub const DEFAULT_LOG_THRESHOLD: f64 = 0.5125;

/// Post-hoc labeling of a calibrated run.
///
/// `windows` holds inclusive `(start, end)` row-index ranges of collapsed
/// alerts; `labels` marks exactly the rows at or above the threshold, so a
/// below-threshold row bridged by the quiet gap is inside a window but
/// carries a 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledWindows {
    pub windows: Vec<(usize, usize)>,
    pub labels: Vec<u8>,
}

/// Labels calibrated rows whose log likelihood clears a threshold and
/// collapses nearby alerts into windows.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdLabeler {
    threshold: f64,
    quiet_gap: usize,
}

impl Default for ThresholdLabeler {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LOG_THRESHOLD,
            quiet_gap: 1,
        }
    }
}

impl ThresholdLabeler {
    /// `quiet_gap` is the largest row distance between two alerting rows
    /// that still lands them in the same window; it is clamped to at
    /// least 1 (directly consecutive rows always merge).
    pub fn new(threshold: f64, quiet_gap: usize) -> Self {
        Self {
            threshold,
            quiet_gap: quiet_gap.max(1),
        }
    }

    pub fn label(&self, log_likelihoods: &[f64]) -> LabeledWindows {
        let mut labels = vec![0u8; log_likelihoods.len()];
        let mut windows = Vec::new();
        let mut current: Option<(usize, usize)> = None;

        for (i, &log_likelihood) in log_likelihoods.iter().enumerate() {
            if log_likelihood.is_nan() || log_likelihood < self.threshold {
                continue;
            }
            labels[i] = 1;
            current = match current {
                Some((start, end)) if i - end <= self.quiet_gap => Some((start, i)),
                Some(done) => {
                    windows.push(done);
                    Some((i, i))
                }
                None => Some((i, i)),
            };
        }
        if let Some(done) = current {
            windows.push(done);
        }

        LabeledWindows { windows, labels }
    }
}
