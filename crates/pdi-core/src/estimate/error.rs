//! Errors raised by the estimation engine.
//!
//! All of these are precondition violations detected before any density is
//! evaluated; none of them is transient.

use thiserror::Error;

/// Errors raised during point estimation, grid construction and MAP selection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    /// The sample carries no information to fit a distribution.
    #[error("degenerate sample: {reason}")]
    DegenerateSample { reason: String },

    /// A parameter pair with a non-positive or non-finite component.
    #[error("invalid gamma parameters in {context}: shape={shape}, rate={rate}")]
    InvalidParameter {
        shape: f64,
        rate: f64,
        context: String,
    },

    #[error("cannot select a MAP estimate from an empty grid")]
    EmptyGrid,

    /// A grid setting outside its valid range.
    #[error("invalid setting for {field}: {message}")]
    InvalidSetting {
        field: &'static str,
        message: String,
    },
}

impl EstimationError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        EstimationError::DegenerateSample {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_parameter(shape: f64, rate: f64, context: impl Into<String>) -> Self {
        EstimationError::InvalidParameter {
            shape,
            rate,
            context: context.into(),
        }
    }
}
