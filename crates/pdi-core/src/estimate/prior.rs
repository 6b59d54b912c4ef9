//! Prior ranges: a 1-D set of candidate parameters around a point estimate.
//!
//! The candidate means and variances are two evenly spaced axes spanning
//! `k` standard errors on either side of the point estimate. They are
//! paired by index, not crossed, so a range of resolution `N` holds `N`
//! candidates. The posterior grid crosses the resulting shape and rate
//! axes to get its `N × N` cells.

use super::error::EstimationError;
use super::params::GammaParams;
use pdi_math::linspace;
use serde::Serialize;

/// Spread multiplier `k` used when none is configured.
pub const DEFAULT_SPREAD: f64 = 3.0;

/// Grid resolution `N` used when none is configured.
pub const DEFAULT_GRID_RESOLUTION: usize = 10;

/// Standard errors of the sample mean and sample variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandardErrors {
    /// `mean / √n`
    pub mean: f64,
    /// `√(2·var² / (n − 1))`
    pub variance: f64,
}

impl StandardErrors {
    pub fn of(center: &GammaParams, sample_size: usize) -> Result<Self, EstimationError> {
        if sample_size < 2 {
            return Err(EstimationError::degenerate(format!(
                "standard errors need at least 2 observations, got {sample_size}"
            )));
        }
        let n = sample_size as f64;
        let mean = center.mean();
        let var = center.variance();
        Ok(StandardErrors {
            mean: mean / n.sqrt(),
            variance: (2.0 * var * var / (n - 1.0)).sqrt(),
        })
    }
}

/// Paired candidate axes around a point estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorRange {
    pub center: GammaParams,
    pub sample_size: usize,
    pub spread: f64,
    pub standard_errors: StandardErrors,
    means: Vec<f64>,
    variances: Vec<f64>,
    shapes: Vec<f64>,
    rates: Vec<f64>,
}

impl PriorRange {
    /// Build `resolution` paired candidates around `center`.
    ///
    /// `sample_size` is the number of observations behind `center`. Every
    /// candidate must come out with a positive mean and variance; a spread
    /// wide enough to cross zero is rejected rather than clamped.
    pub fn build(
        center: GammaParams,
        sample_size: usize,
        resolution: usize,
        spread: f64,
    ) -> Result<Self, EstimationError> {
        if resolution == 0 {
            return Err(EstimationError::InvalidSetting {
                field: "grid_resolution",
                message: "must be at least 1".to_string(),
            });
        }
        if !(spread.is_finite() && spread > 0.0) {
            return Err(EstimationError::InvalidSetting {
                field: "spread",
                message: format!("must be finite and > 0, got {spread}"),
            });
        }

        let se = StandardErrors::of(&center, sample_size)?;
        let mean = center.mean();
        let var = center.variance();

        let means = linspace(mean - spread * se.mean, mean + spread * se.mean, resolution);
        let variances = linspace(
            var - spread * se.variance,
            var + spread * se.variance,
            resolution,
        );

        let mut shapes = Vec::with_capacity(resolution);
        let mut rates = Vec::with_capacity(resolution);
        for (i, (&m, &v)) in means.iter().zip(&variances).enumerate() {
            let candidate = GammaParams::from_moments(m, v, &format!("prior range candidate {i}"))?;
            shapes.push(candidate.shape());
            rates.push(candidate.rate());
        }

        tracing::debug!(
            resolution,
            spread,
            se_mean = se.mean,
            se_variance = se.variance,
            shape_min = shapes.iter().cloned().fold(f64::INFINITY, f64::min),
            shape_max = shapes.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            "prior range built"
        );

        Ok(PriorRange {
            center,
            sample_size,
            spread,
            standard_errors: se,
            means,
            variances,
            shapes,
            rates,
        })
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    /// Candidate shapes, index-paired with [`PriorRange::rates`].
    pub fn shapes(&self) -> &[f64] {
        &self.shapes
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// The `i`-th paired candidate.
    pub fn candidate(&self, i: usize) -> Option<GammaParams> {
        let shape = *self.shapes.get(i)?;
        let rate = *self.rates.get(i)?;
        GammaParams::new(shape, rate).ok()
    }

    /// Candidate at index `N / 2`; equals the center for odd `N` and sits one
    /// half step above it for even `N`.
    pub fn midpoint(&self) -> Option<GammaParams> {
        self.candidate(self.len() / 2)
    }
}
