//! Gamma distribution density for fitting persistence coordinates.
//!
//! # Parameterization
//!
//! Uses **rate parameterization**: `Gamma(α, β)` where:
//! - `α` = shape parameter (α > 0)
//! - `β` = rate parameter (β > 0)
//!
//! The density is: `f(x) = β^α / Γ(α) * x^(α-1) * e^(-βx)`
//!
//! This is equivalent to scale parameterization with `θ = 1/β`, so
//! `mean = α/β` and `variance = α/β²`.

use super::stable::log_gamma;

/// Log of the Gamma distribution PDF at x.
///
/// # Arguments
/// * `x` - The value at which to evaluate
/// * `alpha` - Shape parameter (α > 0)
/// * `beta` - Rate parameter (β > 0)
///
/// # Returns
/// * `log f(x | α, β)`, `-inf` for x < 0, NaN for invalid parameters
pub fn gamma_log_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if x < 0.0 {
        return f64::NEG_INFINITY;
    }

    if x == 0.0 {
        if alpha < 1.0 {
            // Density diverges to +∞
            return f64::INFINITY;
        } else if alpha == 1.0 {
            // Exponential case: f(0) = β
            return beta.ln();
        } else {
            return f64::NEG_INFINITY;
        }
    }

    alpha * beta.ln() - log_gamma(alpha) + (alpha - 1.0) * x.ln() - beta * x
}

/// Gamma distribution PDF at x.
///
/// Returns `exp(gamma_log_pdf(x, alpha, beta))` with the boundary cases
/// mapped explicitly, so negative x gives exactly zero.
pub fn gamma_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    let log_pdf = gamma_log_pdf(x, alpha, beta);
    if log_pdf.is_nan() {
        return f64::NAN;
    }
    if log_pdf == f64::INFINITY {
        return f64::INFINITY;
    }
    if log_pdf == f64::NEG_INFINITY {
        return 0.0;
    }
    log_pdf.exp()
}

/// Mean of Gamma(α, β).
///
/// E[X] = α / β
pub fn gamma_mean(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    alpha / beta
}

/// Variance of Gamma(α, β).
///
/// Var[X] = α / β²
pub fn gamma_var(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    alpha / (beta * beta)
}
