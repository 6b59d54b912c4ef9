//! Method-of-moments point estimation.

use super::error::EstimationError;
use super::params::GammaParams;
use pdi_math::{population_variance, sample_mean};

/// Method-of-moments Gamma fit: `shape = m²/v`, `rate = m/v`.
///
/// `m` is the sample mean and `v` the population variance. The sample must
/// hold at least two finite observations with non-zero variance and a
/// positive mean.
pub fn point_estimate(sample: &[f64]) -> Result<GammaParams, EstimationError> {
    if sample.len() < 2 {
        return Err(EstimationError::degenerate(format!(
            "need at least 2 observations, got {}",
            sample.len()
        )));
    }
    if let Some(pos) = sample.iter().position(|x| !x.is_finite()) {
        return Err(EstimationError::degenerate(format!(
            "observation {pos} is not finite ({})",
            sample[pos]
        )));
    }

    let mean = sample_mean(sample);
    let variance = population_variance(sample);
    if variance <= 0.0 {
        return Err(EstimationError::degenerate(format!(
            "zero variance across {} observations",
            sample.len()
        )));
    }

    let estimate = GammaParams::from_moments(mean, variance, "method-of-moments estimate")?;
    tracing::debug!(
        n = sample.len(),
        mean,
        variance,
        shape = estimate.shape(),
        rate = estimate.rate(),
        "method-of-moments estimate"
    );
    Ok(estimate)
}
