//! Posterior grid over shape × rate candidates.
//!
//! Scoring happens in explicit phases:
//! 1. [`PosteriorGrid::new`] allocates every cell once with a log score of
//!    0.0, the additive identity in log space.
//! 2. [`PosteriorGrid::accumulate`] adds the log-likelihood of a batch of
//!    observations to every cell. It may be called repeatedly; each batch
//!    is counted exactly once.
//! 3. Weights are `exp(log score)`, unnormalized.
//!
//! Cells live in a dense row-major array indexed by (shape index, rate
//! index). Parameter values are carried for reporting only and never used
//! as lookup keys.

use super::error::EstimationError;
use super::map::{select_map, MapEstimate};
use super::params::GammaParams;
use super::prior::PriorRange;
use pdi_math::normalize_log_weights;
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Number of leading observations scored when none is configured.
pub const DEFAULT_SAMPLE_CAP: usize = 100;

/// Observations of exactly zero are moved here before taking log-densities,
/// so that a shape below one cannot contribute `+inf` to a cell.
pub const OBSERVATION_FLOOR: f64 = 1e-12;

/// Sum of log-densities of `observations` under `params`.
pub fn log_likelihood(observations: &[f64], params: &GammaParams) -> f64 {
    observations
        .iter()
        .map(|&x| {
            let x = if x == 0.0 { OBSERVATION_FLOOR } else { x };
            params.log_pdf(x)
        })
        .sum()
}

/// One scored grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PosteriorCell {
    pub params: GammaParams,
    /// Accumulated log-likelihood.
    pub log_score: f64,
    /// `exp(log_score)`, unnormalized.
    pub weight: f64,
    /// (shape index, rate index) when the cell belongs to a grid.
    pub grid_index: Option<(usize, usize)>,
}

impl PosteriorCell {
    /// A free-standing cell with a known linear weight.
    pub fn from_weight(params: GammaParams, weight: f64) -> Self {
        PosteriorCell {
            params,
            log_score: weight.ln(),
            weight,
            grid_index: None,
        }
    }
}

/// Dense posterior grid over the cross product of two candidate axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosteriorGrid {
    shapes: Vec<f64>,
    rates: Vec<f64>,
    cells: Vec<PosteriorCell>,
    observations: usize,
}

impl PosteriorGrid {
    /// Allocate the `shapes.len() × rates.len()` grid with zero log scores.
    ///
    /// Every candidate is validated here, before any density is evaluated.
    pub fn new(shapes: &[f64], rates: &[f64]) -> Result<Self, EstimationError> {
        let mut cells = Vec::with_capacity(shapes.len() * rates.len());
        for (i, &shape) in shapes.iter().enumerate() {
            for (j, &rate) in rates.iter().enumerate() {
                let context = format!("posterior cell ({i}, {j})");
                let params = GammaParams::checked(shape, rate, &context)?;
                cells.push(PosteriorCell {
                    params,
                    log_score: 0.0,
                    weight: 1.0,
                    grid_index: Some((i, j)),
                });
            }
        }
        Ok(PosteriorGrid {
            shapes: shapes.to_vec(),
            rates: rates.to_vec(),
            cells,
            observations: 0,
        })
    }

    /// Score the cross product of a prior range's shapes and rates against
    /// the first `sample_cap` observations of `sample`.
    pub fn evaluate(
        sample: &[f64],
        range: &PriorRange,
        sample_cap: usize,
    ) -> Result<Self, EstimationError> {
        if sample_cap == 0 {
            return Err(EstimationError::InvalidSetting {
                field: "sample_cap",
                message: "must be at least 1".to_string(),
            });
        }
        let prefix = &sample[..sample.len().min(sample_cap)];
        if prefix.is_empty() {
            return Err(EstimationError::degenerate("no observations to score"));
        }

        let mut grid = PosteriorGrid::new(range.shapes(), range.rates())?;
        grid.accumulate(prefix)?;
        Ok(grid)
    }

    /// Add the log-likelihood of `observations` to every cell.
    pub fn accumulate(&mut self, observations: &[f64]) -> Result<(), EstimationError> {
        if let Some(pos) = observations.iter().position(|x| !x.is_finite()) {
            return Err(EstimationError::degenerate(format!(
                "observation {pos} is not finite ({})",
                observations[pos]
            )));
        }

        #[cfg(feature = "parallel")]
        self.cells.par_iter_mut().for_each(|cell| {
            cell.log_score += log_likelihood(observations, &cell.params);
            cell.weight = cell.log_score.exp();
        });

        #[cfg(not(feature = "parallel"))]
        for cell in &mut self.cells {
            cell.log_score += log_likelihood(observations, &cell.params);
            cell.weight = cell.log_score.exp();
        }

        self.observations += observations.len();
        tracing::debug!(
            cells = self.cells.len(),
            batch = observations.len(),
            observations = self.observations,
            "posterior grid accumulated"
        );
        Ok(())
    }

    pub fn shape_axis(&self) -> &[f64] {
        &self.shapes
    }

    pub fn rate_axis(&self) -> &[f64] {
        &self.rates
    }

    /// (number of shapes, number of rates)
    pub fn dims(&self) -> (usize, usize) {
        (self.shapes.len(), self.rates.len())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Total number of observations accumulated so far.
    pub fn observations(&self) -> usize {
        self.observations
    }

    pub fn cells(&self) -> &[PosteriorCell] {
        &self.cells
    }

    /// Cell at (shape index, rate index).
    pub fn cell(&self, shape_index: usize, rate_index: usize) -> Option<&PosteriorCell> {
        if shape_index >= self.shapes.len() || rate_index >= self.rates.len() {
            return None;
        }
        self.cells.get(shape_index * self.rates.len() + rate_index)
    }

    /// Posterior mass per cell, normalized in log space. Row-major like
    /// [`PosteriorGrid::cells`].
    pub fn normalized_weights(&self) -> Vec<f64> {
        let log_scores: Vec<f64> = self.cells.iter().map(|c| c.log_score).collect();
        normalize_log_weights(&log_scores)
    }

    pub fn map_estimate(&self) -> Result<MapEstimate, EstimationError> {
        select_map(self.cells.iter().copied())
    }
}
