//! End-to-end fitting of a persistence diagram.
//!
//! Each marginal goes through point estimate → prior range → posterior grid
//! → MAP. The prior range is sized by the full sample while the likelihood
//! only scores the first `sample_cap` observations.

use super::error::EstimationError;
use super::joint::{mesh_axis, JointIntensity, SurfaceMesh};
use super::map::MapEstimate;
use super::params::GammaParams;
use super::posterior::PosteriorGrid;
use super::prior::PriorRange;
use crate::config::{EstimationConfig, InitialEstimate};
use crate::diagram::Diagram;
use serde::Serialize;

/// Result of fitting one marginal.
#[derive(Debug, Clone, Serialize)]
pub struct MarginalFit {
    pub point_estimate: GammaParams,
    pub initial_method: &'static str,
    pub prior_range: PriorRange,
    pub map: MapEstimate,
    pub sample_size: usize,
    pub observations_used: usize,
    #[serde(skip)]
    pub posterior: PosteriorGrid,
}

/// Fit a Gamma marginal to `sample`.
pub fn fit_marginal(
    sample: &[f64],
    initial: &InitialEstimate,
    config: &EstimationConfig,
) -> Result<MarginalFit, EstimationError> {
    config.validate()?;

    let point_estimate = initial.resolve(sample)?;
    let prior_range = PriorRange::build(
        point_estimate,
        sample.len(),
        config.grid_resolution,
        config.spread,
    )?;
    let posterior = PosteriorGrid::evaluate(sample, &prior_range, config.sample_cap)?;
    let map = posterior.map_estimate()?;

    tracing::debug!(
        n = sample.len(),
        used = posterior.observations(),
        initial = %point_estimate,
        map = %map.params,
        log_score = map.log_score,
        "marginal fitted"
    );

    Ok(MarginalFit {
        point_estimate,
        initial_method: initial.label(),
        prior_range,
        map,
        sample_size: sample.len(),
        observations_used: posterior.observations(),
        posterior,
    })
}

/// Fitted creation and destruction marginals of a diagram.
#[derive(Debug, Clone, Serialize)]
pub struct DiagramFit {
    pub creation: MarginalFit,
    pub destruction: MarginalFit,
}

impl DiagramFit {
    /// Joint intensity built from the two MAP estimates.
    pub fn intensity(&self) -> JointIntensity {
        JointIntensity::new(self.creation.map.params, self.destruction.map.params)
    }

    /// Sample the intensity on the sorted capped creation and destruction
    /// values of `diagram`.
    pub fn surface(&self, diagram: &Diagram, sample_cap: usize) -> SurfaceMesh {
        let xs = mesh_axis(&diagram.creation_values(), sample_cap);
        let ys = mesh_axis(&diagram.destruction_values(), sample_cap);
        self.intensity().sample_mesh(&xs, &ys)
    }
}

/// Fit both marginals of `diagram`.
pub fn fit_diagram(
    diagram: &Diagram,
    config: &EstimationConfig,
) -> Result<DiagramFit, EstimationError> {
    let creation = fit_marginal(
        &diagram.creation_values(),
        &config.creation_initial,
        config,
    )?;
    let destruction = fit_marginal(
        &diagram.destruction_values(),
        &config.destruction_initial,
        config,
    )?;
    Ok(DiagramFit {
        creation,
        destruction,
    })
}
