use std::fmt::{self, Debug, Display, Formatter};
use std::io::Write;
use std::sync::mpsc::Sender;
use std::time::Instant;

use tracing::info;

use crate::likelihood::{AnomalyLikelihood, LikelihoodScore};
use crate::streams::ScoredStream;
use crate::tasks::TaskError;

/// Column layout of the calibrated output rows.
pub const OUTPUT_HEADER: &str = "timestamp,value,anomaly_score,likelihood,log_likelihood";

/// Point-in-time progress of a calibration run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CalibrationSnapshot {
    pub records_seen: u64,
    /// Likelihood of the most recent record, `NaN` before the first one.
    pub likelihood: f64,
    pub log_likelihood: f64,
    /// Highest log likelihood seen so far, `NaN` before the first record.
    pub max_log_likelihood: f64,
    pub refits: u64,
    pub seconds: f64,
}

impl Display for CalibrationSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seen={}, lik={:.6}, log={:.6}, max_log={:.6}, refits={}, t={:.3}s",
            self.records_seen,
            self.likelihood,
            self.log_likelihood,
            self.max_log_likelihood,
            self.refits,
            self.seconds
        )
    }
}

/// Final accounting of one calibration run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RunSummary {
    pub records: u64,
    pub refits: u64,
    /// `NaN` when the run processed no records.
    pub max_log_likelihood: f64,
    pub seconds: f64,
}

/// Drives the calibration pipeline: pulls scored observations from a stream,
/// feeds the estimator, and writes one output row per record.
///
/// Distribution-fit warnings never abort the run; hard estimator errors
/// (out-of-order input) and I/O errors do.
pub struct CalibrationRunner<T> {
    estimator: AnomalyLikelihood<T>,
    stream: Box<dyn ScoredStream<T>>,

    max_records: Option<u64>,
    sample_frequency: u64,

    processed: u64,
    start_time: Instant,
    max_log_likelihood: f64,
    last: Option<LikelihoodScore>,

    snapshots: Vec<CalibrationSnapshot>,
    progress_tx: Option<Sender<CalibrationSnapshot>>,
}

impl<T: Copy + PartialOrd + Debug> CalibrationRunner<T> {
    pub fn new(
        estimator: AnomalyLikelihood<T>,
        stream: Box<dyn ScoredStream<T>>,
        max_records: Option<u64>,
        sample_frequency: u64,
    ) -> Result<Self, TaskError> {
        if sample_frequency == 0 {
            return Err(TaskError::InvalidParameter(
                "sample_frequency must be > 0".into(),
            ));
        }

        Ok(Self {
            estimator,
            stream,
            max_records,
            sample_frequency,
            processed: 0,
            start_time: Instant::now(),
            max_log_likelihood: f64::NAN,
            last: None,
            snapshots: Vec::new(),
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<CalibrationSnapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn run(&mut self, out: &mut dyn Write) -> Result<RunSummary, TaskError> {
        self.start_time = Instant::now();
        writeln!(out, "{OUTPUT_HEADER}")?;

        while self.stream.has_more_records() {
            if let Some(n) = self.max_records {
                if self.processed >= n {
                    break;
                }
            }
            let Some(observation) = self.stream.next_observation() else {
                break;
            };

            let score = self.estimator.score(
                observation.timestamp,
                observation.value,
                observation.raw_score,
            )?;
            self.processed += 1;
            // f64::max ignores the NaN initial value.
            self.max_log_likelihood = self.max_log_likelihood.max(score.log_likelihood);
            self.last = Some(score);

            writeln!(
                out,
                "{:?},{},{},{},{}",
                observation.timestamp,
                observation.value,
                observation.raw_score,
                score.likelihood,
                score.log_likelihood
            )?;

            if self.processed % 500 == 0 {
                info!(records = self.processed, "calibration progress");
            }
            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot();
            }
        }

        self.push_snapshot();
        Ok(RunSummary {
            records: self.processed,
            refits: self.estimator.refit_count(),
            max_log_likelihood: self.max_log_likelihood,
            seconds: self.start_time.elapsed().as_secs_f64(),
        })
    }

    pub fn snapshots(&self) -> &[CalibrationSnapshot] {
        &self.snapshots
    }

    pub fn estimator(&self) -> &AnomalyLikelihood<T> {
        &self.estimator
    }

    /// Hands the estimator back, e.g. to checkpoint it after the run.
    pub fn into_estimator(self) -> AnomalyLikelihood<T> {
        self.estimator
    }

    fn push_snapshot(&mut self) {
        let snapshot = CalibrationSnapshot {
            records_seen: self.processed,
            likelihood: self.last.map_or(f64::NAN, |s| s.likelihood),
            log_likelihood: self.last.map_or(f64::NAN, |s| s.log_likelihood),
            max_log_likelihood: self.max_log_likelihood,
            refits: self.estimator.refit_count(),
            seconds: self.start_time.elapsed().as_secs_f64(),
        };

        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot);
        }
        self.snapshots.push(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Observation;
    use crate::likelihood::EstimatorConfig;
    use crate::testing::stubs::VecScoredStream;
    use std::sync::mpsc;

    fn estimator(probation: u64, refit: u64) -> AnomalyLikelihood<u64> {
        AnomalyLikelihood::new(EstimatorConfig {
            probationary_period: probation,
            learning_period: 0,
            refit_interval: refit,
            ..Default::default()
        })
        .unwrap()
    }

    fn observations(n: u64) -> Vec<Observation<u64>> {
        (0..n)
            .map(|i| Observation::new(i, i as f64, 0.1 + (i % 5) as f64 * 0.05))
            .collect()
    }

    #[test]
    fn ctor_guards() {
        let stream = Box::new(VecScoredStream::new(observations(5)));
        let err = CalibrationRunner::new(estimator(5, 5), stream, None, 0)
            .err()
            .unwrap();
        assert!(matches!(err, TaskError::InvalidParameter(_)));
    }

    #[test]
    fn writes_header_and_one_row_per_record() {
        let stream = Box::new(VecScoredStream::new(observations(25)));
        let mut runner = CalibrationRunner::new(estimator(5, 5), stream, None, 10).unwrap();

        let mut out = Vec::new();
        let summary = runner.run(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], OUTPUT_HEADER);
        assert_eq!(lines.len(), 26);
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), 5, "row {line}");
        }

        assert_eq!(summary.records, 25);
        assert_eq!(summary.refits, runner.estimator().refit_count());
        assert!(summary.max_log_likelihood.is_finite());

        // Two periodic snapshots plus the final one.
        assert_eq!(runner.snapshots().len(), 3);
        assert_eq!(runner.snapshots().last().unwrap().records_seen, 25);
    }

    #[test]
    fn stops_at_max_records() {
        let stream = Box::new(VecScoredStream::new(observations(100)));
        let mut runner = CalibrationRunner::new(estimator(5, 5), stream, Some(25), 10).unwrap();

        let mut out = Vec::new();
        let summary = runner.run(&mut out).unwrap();
        assert_eq!(summary.records, 25);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 26);
    }

    #[test]
    fn progress_channel_sees_periodic_snapshots() {
        let (tx, rx) = mpsc::channel();
        let stream = Box::new(VecScoredStream::new(observations(25)));
        let mut runner = CalibrationRunner::new(estimator(5, 5), stream, None, 10)
            .unwrap()
            .with_progress(tx);

        let mut out: Vec<u8> = Vec::new();
        runner.run(&mut out).unwrap();

        let received: Vec<CalibrationSnapshot> = rx.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert_eq!(received[0].records_seen, 10);
        assert_eq!(received.last().unwrap().records_seen, 25);
        assert_eq!(received.last().unwrap().refits, runner.estimator().refit_count());
    }

    #[test]
    fn out_of_order_input_aborts_the_run() {
        let rows = vec![
            Observation::new(10u64, 1.0, 0.2),
            Observation::new(9u64, 1.0, 0.2),
        ];
        let stream = Box::new(VecScoredStream::new(rows));
        let mut runner = CalibrationRunner::new(estimator(5, 5), stream, None, 10).unwrap();

        let mut out: Vec<u8> = Vec::new();
        let err = runner.run(&mut out).unwrap_err();
        assert!(matches!(err, TaskError::Likelihood(_)));
    }
}
