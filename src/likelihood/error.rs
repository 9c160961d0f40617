use thiserror::Error;

/// Failures surfaced by the likelihood estimator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LikelihoodError {
    /// The distribution fitter could not produce a model. Recoverable: the
    /// estimator keeps the previous distribution (when one exists) and tries
    /// again at the next refit boundary.
    #[error("distribution fit failed: {0}")]
    DistributionFit(String),

    /// `score()` received a timestamp earlier than the latest recorded one.
    /// The offending observation is rejected without touching history or the
    /// iteration counter.
    #[error("out-of-order timestamp: {offered} precedes latest {latest}")]
    OutOfOrder { latest: String, offered: String },

    /// Rejected settings. Raised at construction or snapshot restore, never
    /// while scoring.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let e = LikelihoodError::DistributionFit("empty sample".into());
        assert_eq!(e.to_string(), "distribution fit failed: empty sample");

        let e = LikelihoodError::OutOfOrder {
            latest: "10".into(),
            offered: "9".into(),
        };
        assert!(e.to_string().contains("9 precedes latest 10"));

        let e = LikelihoodError::Configuration("x".into());
        assert!(e.to_string().starts_with("invalid configuration"));
    }
}
