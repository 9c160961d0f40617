use serde::{Deserialize, Serialize};

use crate::likelihood::error::LikelihoodError;
use crate::utils::math::{mean, normal_tail_probability, population_variance};

/// Historical lower bounds on the fitted moments. A near-zero mean or
/// variance (constant or vanishing score history) would otherwise let the
/// slightest score blip register as an extreme anomaly; the floors keep the
/// null model usable instead of failing the fit.
pub const MEAN_LOWER_BOUND: f64 = 0.03;
pub const VARIANCE_LOWER_BOUND: f64 = 0.0003;

/// Normal null model fitted over historical raw scores.
///
/// Immutable once produced: refits build a fresh value that the estimator
/// swaps in wholesale, so a half-updated model can never be observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub mean: f64,
    pub variance: f64,
    /// `sqrt(variance)`; strictly positive thanks to the variance floor.
    pub stdev: f64,
    /// Post-skip samples the fit was computed from.
    pub sample_size: usize,
}

impl ScoreDistribution {
    /// `P(score' >= score)` under this model.
    #[inline]
    pub fn tail_probability(&self, score: f64) -> f64 {
        normal_tail_probability((score - self.mean) / self.stdev)
    }
}

/// Fits a null distribution over a window of raw scores.
///
/// Consumed by the estimator as a pure function: two calls with the same
/// input must return the same model, with no hidden state in between.
pub trait DistributionFitter {
    /// `scores` is the retained history in arrival order; the first `skip`
    /// entries are upstream-model warm-up and must not shape the null model.
    fn fit(&self, scores: &[f64], skip: usize) -> Result<ScoreDistribution, LikelihoodError>;
}

/// Moment-matched normal with the historical lower-bound floors.
#[derive(Debug, Default, Clone, Copy)]
pub struct GaussianMomentFitter;

impl DistributionFitter for GaussianMomentFitter {
    fn fit(&self, scores: &[f64], skip: usize) -> Result<ScoreDistribution, LikelihoodError> {
        let sample = &scores[skip.min(scores.len())..];
        if sample.is_empty() {
            return Err(LikelihoodError::DistributionFit(format!(
                "no samples left after skipping {skip} warm-up scores"
            )));
        }

        let mut mean = mean(sample);
        let mut variance = population_variance(sample);
        if !mean.is_finite() || !variance.is_finite() {
            return Err(LikelihoodError::DistributionFit(
                "score history contains non-finite values".into(),
            ));
        }

        if mean < MEAN_LOWER_BOUND {
            mean = MEAN_LOWER_BOUND;
        }
        if variance < VARIANCE_LOWER_BOUND {
            variance = VARIANCE_LOWER_BOUND;
        }

        Ok(ScoreDistribution {
            mean,
            variance,
            stdev: variance.sqrt(),
            sample_size: sample.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPS: f64 = 1e-9;

    #[test]
    fn constant_zero_scores_hit_both_floors() {
        let scores = vec![0.0; 300];
        let dist = GaussianMomentFitter.fit(&scores, 0).unwrap();
        assert_eq!(dist.mean, MEAN_LOWER_BOUND);
        assert_eq!(dist.variance, VARIANCE_LOWER_BOUND);
        assert!((dist.stdev - VARIANCE_LOWER_BOUND.sqrt()).abs() <= EPS);
        assert_eq!(dist.sample_size, 300);
    }

    #[test]
    fn spread_scores_keep_their_moments() {
        let scores: Vec<f64> = (0..100).map(|i| 0.2 + 0.1 * ((i % 5) as f64)).collect();
        let dist = GaussianMomentFitter.fit(&scores, 0).unwrap();
        assert!((dist.mean - 0.4).abs() <= EPS);
        assert!((dist.variance - 0.02).abs() <= EPS);
    }

    #[test]
    fn skip_excludes_warm_up_scores() {
        // Half warm-up noise at 0.9, half steady 0.1: only the latter counts.
        let mut scores = vec![0.9; 50];
        scores.extend(vec![0.1; 50]);
        let dist = GaussianMomentFitter.fit(&scores, 50).unwrap();
        assert!((dist.mean - 0.1).abs() <= EPS);
        assert_eq!(dist.sample_size, 50);
    }

    #[test]
    fn empty_post_skip_sample_is_an_error() {
        let scores = vec![0.5; 10];
        let err = GaussianMomentFitter.fit(&scores, 10).unwrap_err();
        assert!(matches!(err, LikelihoodError::DistributionFit(_)));

        let err = GaussianMomentFitter.fit(&[], 0).unwrap_err();
        assert!(matches!(err, LikelihoodError::DistributionFit(_)));
    }

    #[test]
    fn non_finite_scores_are_an_error() {
        let scores = vec![0.1, f64::NAN, 0.2];
        assert!(GaussianMomentFitter.fit(&scores, 0).is_err());
    }

    #[test]
    fn tail_probability_decreases_in_score() {
        let scores: Vec<f64> = (0..200).map(|i| (i as f64 % 10.0) / 10.0).collect();
        let dist = GaussianMomentFitter.fit(&scores, 0).unwrap();

        let mut prev = dist.tail_probability(-1.0);
        for i in 0..40 {
            let t = dist.tail_probability(-1.0 + i as f64 * 0.1);
            assert!(t <= prev + EPS);
            prev = t;
        }
    }

    #[test]
    fn tail_at_mean_is_half_and_low_scores_are_unsurprising() {
        let scores: Vec<f64> = (0..100).map(|i| 0.3 + 0.2 * ((i % 2) as f64)).collect();
        let dist = GaussianMomentFitter.fit(&scores, 0).unwrap();
        assert!((dist.tail_probability(dist.mean) - 0.5).abs() <= EPS);
        // Far below the mean the upper tail saturates toward 1.
        assert!(dist.tail_probability(-5.0) > 0.999);
    }
}
