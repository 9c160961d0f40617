use std::f64::consts::{PI, TAU};
use std::io::{Error, ErrorKind};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::Record;
use crate::streams::stream::RecordStream;

/// Distance between consecutive samples on the x axis, giving 100 samples
/// per sine cycle.
const X_STEP: f64 = PI / 50.0;

/// Cycle-phase window in which an injected anomaly fires: the offset is
/// applied when `x mod 2π` reaches the high mark or has not yet passed the
/// low one, so the window straddles the cycle boundary.
const PHASE_HIGH: f64 = 6.1;
const PHASE_LOW: f64 = 0.2;

/// Repeating additive offset injected into a sine stream once per cycle.
///
/// The defaults reproduce the historical artificial dataset: +1.5 near the
/// top of every cycle, starting at sample 2450.
#[derive(Debug, Clone, Copy)]
pub struct PhaseAnomaly {
    /// First sample index at which the offset may fire.
    pub start_index: usize,
    /// Additive offset applied inside the phase window.
    pub magnitude: f64,
}

impl Default for PhaseAnomaly {
    fn default() -> Self {
        Self {
            start_index: 2450,
            magnitude: 1.5,
        }
    }
}

/// Deterministic synthetic sine stream: `value = sin(i·π/50)` with optional
/// uniform noise and an optional injected [`PhaseAnomaly`]. The record
/// timestamp is the x coordinate itself.
#[derive(Debug)]
pub struct SineGenerator {
    seed: u64,
    rng: StdRng,
    noise_amplitude: f64,
    anomaly: Option<PhaseAnomaly>,
    max_records: Option<usize>,
    produced: usize,
}

impl SineGenerator {
    pub fn new(
        noise_amplitude: f64,
        anomaly: Option<PhaseAnomaly>,
        max_records: Option<usize>,
        seed: u64,
    ) -> Result<Self, Error> {
        if !noise_amplitude.is_finite() || noise_amplitude < 0.0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Noise amplitude must be finite and non-negative",
            ));
        }
        if let Some(anomaly) = anomaly {
            if !anomaly.magnitude.is_finite() {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    "Anomaly magnitude must be finite",
                ));
            }
        }

        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            noise_amplitude,
            anomaly,
            max_records,
            produced: 0,
        })
    }

    #[inline]
    fn in_phase_window(x: f64) -> bool {
        let position = x % TAU;
        position >= PHASE_HIGH || position <= PHASE_LOW
    }
}

impl RecordStream<f64> for SineGenerator {
    fn has_more_records(&self) -> bool {
        self.max_records.map_or(true, |max| self.produced < max)
    }

    fn next_record(&mut self) -> Option<Record<f64>> {
        if !self.has_more_records() {
            return None;
        }

        let x = self.produced as f64 * X_STEP;
        let mut value = x.sin();

        if let Some(anomaly) = self.anomaly {
            if self.produced >= anomaly.start_index && Self::in_phase_window(x) {
                value += anomaly.magnitude;
            }
        }
        if self.noise_amplitude > 0.0 {
            value += self
                .rng
                .random_range(-self.noise_amplitude..self.noise_amplitude);
        }

        self.produced += 1;
        Some(Record::new(x, value))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records_from(generator: &mut SineGenerator, n: usize) -> Vec<Record<f64>> {
        (0..n)
            .map(|_| generator.next_record().expect("record"))
            .collect()
    }

    #[test]
    fn pure_signal_matches_the_waveform() {
        let mut generator = SineGenerator::new(0.0, None, Some(100), 1).unwrap();
        for i in 0..100 {
            let record = generator.next_record().unwrap();
            let x = i as f64 * X_STEP;
            assert_eq!(record.timestamp, x);
            assert!((record.value - x.sin()).abs() <= 1e-12, "sample {i}");
        }
        assert!(generator.next_record().is_none());
    }

    #[test]
    fn anomaly_fires_only_in_the_phase_window_after_its_start() {
        let anomaly = PhaseAnomaly::default();
        let mut generator = SineGenerator::new(0.0, Some(anomaly), Some(2600), 7).unwrap();

        let mut fired = 0usize;
        for i in 0..2600 {
            let record = generator.next_record().unwrap();
            let x = i as f64 * X_STEP;
            let offset = record.value - x.sin();
            let position = x % TAU;
            let in_window = position >= PHASE_HIGH || position <= PHASE_LOW;

            if i >= anomaly.start_index && in_window {
                assert!((offset - anomaly.magnitude).abs() <= 1e-12, "sample {i}");
                fired += 1;
            } else {
                assert!(offset.abs() <= 1e-12, "unexpected offset at sample {i}");
            }
        }
        assert!(fired > 0, "the window never fired in 2600 samples");
    }

    #[test]
    fn noise_is_bounded_and_seeded() {
        let mut a = SineGenerator::new(0.1, None, Some(200), 42).unwrap();
        let mut b = SineGenerator::new(0.1, None, Some(200), 42).unwrap();

        for i in 0..200 {
            let ra = a.next_record().unwrap();
            let rb = b.next_record().unwrap();
            assert_eq!(ra, rb, "seeded streams diverged at sample {i}");
            assert!((ra.value - ra.timestamp.sin()).abs() <= 0.1);
        }
    }

    #[test]
    fn restart_replays_the_same_sequence() {
        let mut generator =
            SineGenerator::new(0.1, Some(PhaseAnomaly::default()), Some(100), 12345).unwrap();
        let first = records_from(&mut generator, 50);
        generator.restart().unwrap();
        let second = records_from(&mut generator, 50);
        assert_eq!(first, second);
    }

    #[test]
    fn max_records_bounds_the_stream() {
        let mut generator = SineGenerator::new(0.0, None, Some(10), 1).unwrap();
        assert_eq!(records_from(&mut generator, 10).len(), 10);
        assert!(!generator.has_more_records());
        assert!(generator.next_record().is_none());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let err = SineGenerator::new(-0.1, None, None, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = SineGenerator::new(f64::NAN, None, None, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let bad = PhaseAnomaly {
            start_index: 0,
            magnitude: f64::INFINITY,
        };
        let err = SineGenerator::new(0.0, Some(bad), None, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
