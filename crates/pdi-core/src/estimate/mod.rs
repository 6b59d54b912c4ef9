//! Grid-based Bayesian estimation of Gamma marginals.
//!
//! Components, leaf-first:
//! - [`params`]: validated (shape, rate) pairs
//! - [`point`]: method-of-moments point estimate
//! - [`prior`]: paired candidate axes around a point estimate
//! - [`posterior`]: shape × rate grid of accumulated log-likelihoods
//! - [`map`]: maximum-a-posteriori selection
//! - [`joint`]: product of two marginals and mesh sampling
//! - [`pipeline`]: the above chained per marginal and per diagram

pub mod error;
pub mod joint;
pub mod map;
pub mod params;
pub mod pipeline;
pub mod point;
pub mod posterior;
pub mod prior;

pub use error::EstimationError;
pub use joint::{mesh_axis, JointIntensity, SurfaceMesh};
pub use map::{select_map, MapEstimate};
pub use params::GammaParams;
pub use pipeline::{fit_diagram, fit_marginal, DiagramFit, MarginalFit};
pub use point::point_estimate;
pub use posterior::{
    log_likelihood, PosteriorCell, PosteriorGrid, DEFAULT_SAMPLE_CAP, OBSERVATION_FLOOR,
};
pub use prior::{PriorRange, StandardErrors, DEFAULT_GRID_RESOLUTION, DEFAULT_SPREAD};
