//! Validated Gamma(shape, rate) parameter pairs.

use super::error::EstimationError;
use pdi_math::{gamma_log_pdf, gamma_pdf};
use serde::Serialize;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Shape/rate parameters of a Gamma distribution.
///
/// Both components are finite and strictly positive; the constructors are
/// the only way to build a value. Equality, ordering and hashing use the
/// IEEE total order, ordering by shape first and rate second, so pairs can
/// be sorted and used as map keys.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GammaParams {
    shape: f64,
    rate: f64,
}

impl GammaParams {
    pub fn new(shape: f64, rate: f64) -> Result<Self, EstimationError> {
        Self::checked(shape, rate, "gamma parameters")
    }

    /// Like [`GammaParams::new`], naming `context` in the error.
    pub fn checked(shape: f64, rate: f64, context: &str) -> Result<Self, EstimationError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(shape) || !valid(rate) {
            return Err(EstimationError::invalid_parameter(shape, rate, context));
        }
        Ok(GammaParams { shape, rate })
    }

    /// Invert `mean = shape/rate`, `variance = shape/rate²`.
    pub fn from_moments(mean: f64, variance: f64, context: &str) -> Result<Self, EstimationError> {
        let shape = mean * mean / variance;
        let rate = mean / variance;
        if !(mean > 0.0 && variance > 0.0) {
            return Err(EstimationError::invalid_parameter(shape, rate, context));
        }
        Self::checked(shape, rate, context)
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn mean(&self) -> f64 {
        self.shape / self.rate
    }

    pub fn variance(&self) -> f64 {
        self.shape / (self.rate * self.rate)
    }

    /// Density at `x`; zero for negative `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        gamma_pdf(x, self.shape, self.rate)
    }

    /// Natural-log density at `x`; `-inf` for negative `x`.
    pub fn log_pdf(&self, x: f64) -> f64 {
        gamma_log_pdf(x, self.shape, self.rate)
    }
}

impl PartialEq for GammaParams {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GammaParams {}

impl PartialOrd for GammaParams {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GammaParams {
    fn cmp(&self, other: &Self) -> Ordering {
        self.shape
            .total_cmp(&other.shape)
            .then_with(|| self.rate.total_cmp(&other.rate))
    }
}

impl Hash for GammaParams {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shape.to_bits().hash(state);
        self.rate.to_bits().hash(state);
    }
}

impl std::fmt::Display for GammaParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gamma(shape={:.6}, rate={:.6})", self.shape, self.rate)
    }
}
