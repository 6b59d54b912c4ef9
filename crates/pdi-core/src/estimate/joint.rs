//! Joint intensity of independent creation and destruction marginals.

use super::params::GammaParams;
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Product of two fitted marginal densities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JointIntensity {
    pub creation: GammaParams,
    pub destruction: GammaParams,
}

impl JointIntensity {
    pub fn new(creation: GammaParams, destruction: GammaParams) -> Self {
        JointIntensity {
            creation,
            destruction,
        }
    }

    /// `pdf_c(x) · pdf_d(y)`.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.creation.pdf(x) * self.destruction.pdf(y)
    }

    pub fn log_evaluate(&self, x: f64, y: f64) -> f64 {
        self.creation.log_pdf(x) + self.destruction.log_pdf(y)
    }

    /// Evaluate over the meshgrid of `xs` × `ys`.
    ///
    /// Rows follow `ys` and columns follow `xs`: `values[j][i]` is the
    /// intensity at `(xs[i], ys[j])`.
    pub fn sample_mesh(&self, xs: &[f64], ys: &[f64]) -> SurfaceMesh {
        let row = |y: &f64| -> Vec<f64> { xs.iter().map(|&x| self.evaluate(x, *y)).collect() };

        #[cfg(feature = "parallel")]
        let values: Vec<Vec<f64>> = ys.par_iter().map(row).collect();

        #[cfg(not(feature = "parallel"))]
        let values: Vec<Vec<f64>> = ys.iter().map(row).collect();

        SurfaceMesh {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            values,
        }
    }
}

/// A joint intensity sampled on a rectangular mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceMesh {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// `values[j][i]` at `(xs[i], ys[j])`.
    pub values: Vec<Vec<f64>>,
}

impl SurfaceMesh {
    /// Largest sampled value and its (x, y) position.
    pub fn peak(&self) -> Option<(f64, f64, f64)> {
        let mut best: Option<(f64, f64, f64)> = None;
        for (j, row) in self.values.iter().enumerate() {
            for (i, &z) in row.iter().enumerate() {
                if z.is_nan() {
                    continue;
                }
                if best.map_or(true, |(_, _, b)| z > b) {
                    best = Some((self.xs[i], self.ys[j], z));
                }
            }
        }
        best
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.xs.len(), self.ys.len())
    }
}

/// Sorted copy of the first `cap` observations, used as a mesh axis.
pub fn mesh_axis(sample: &[f64], cap: usize) -> Vec<f64> {
    let mut axis = sample[..sample.len().min(cap)].to_vec();
    axis.sort_by(f64::total_cmp);
    axis
}
