/// Standard normal upper-tail (Q function): `P(Z >= z)` for `Z ~ N(0, 1)`.
///
/// Uses `erfc` rather than `1 - cdf` so that deep tails (`z` around 8 and
/// beyond) keep precision instead of rounding to zero.
pub fn normal_tail_probability(z: f64) -> f64 {
    0.5 * libm::erfc(z / (2.0f64).sqrt())
}

/// Arithmetic mean. `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divide by `n`, not `n - 1`). `NaN` for an empty slice.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}
