//! Maximum-a-posteriori selection over scored cells.

use super::error::EstimationError;
use super::params::GammaParams;
use super::posterior::PosteriorCell;
use serde::Serialize;

/// The most probable cell of a posterior grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapEstimate {
    pub params: GammaParams,
    /// Unnormalized posterior weight of the chosen cell.
    pub weight: f64,
    pub log_score: f64,
    pub grid_index: Option<(usize, usize)>,
}

impl From<PosteriorCell> for MapEstimate {
    fn from(cell: PosteriorCell) -> Self {
        MapEstimate {
            params: cell.params,
            weight: cell.weight,
            log_score: cell.log_score,
            grid_index: cell.grid_index,
        }
    }
}

/// Pick the cell with the strictly greatest weight.
///
/// Candidates are visited in ascending (shape, rate) order and only a
/// strict improvement replaces the current best, so ties resolve to the
/// smallest shape, then the smallest rate. Cells are compared on their log
/// score, which orders them like their weights but stays distinguishable
/// when the weights underflow to zero. NaN scores never win, and a grid
/// where every score is `-inf` has no MAP.
pub fn select_map<I>(cells: I) -> Result<MapEstimate, EstimationError>
where
    I: IntoIterator<Item = PosteriorCell>,
{
    let mut cells: Vec<PosteriorCell> = cells.into_iter().collect();
    if cells.is_empty() {
        return Err(EstimationError::EmptyGrid);
    }
    cells.sort_by(|a, b| a.params.cmp(&b.params));

    let mut best: Option<PosteriorCell> = None;
    for cell in cells {
        if cell.log_score.is_nan() {
            continue;
        }
        match best {
            Some(current) if cell.log_score <= current.log_score => {}
            _ => best = Some(cell),
        }
    }

    let best = best.ok_or_else(|| EstimationError::degenerate("every posterior score is NaN"))?;
    if best.log_score == f64::NEG_INFINITY {
        return Err(EstimationError::degenerate(
            "no candidate assigns positive likelihood to the sample",
        ));
    }
    if best.weight == 0.0 {
        tracing::debug!(
            log_score = best.log_score,
            "MAP weight underflows; selected by log score"
        );
    }
    Ok(best.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(shape: f64, rate: f64) -> GammaParams {
        GammaParams::new(shape, rate).unwrap()
    }

    #[test]
    fn two_cell_grid() {
        let cells = vec![
            PosteriorCell::from_weight(params(1.0, 1.0), 0.3),
            PosteriorCell::from_weight(params(2.0, 2.0), 0.9),
        ];
        let map = select_map(cells).unwrap();
        assert_eq!(map.params, params(2.0, 2.0));
        assert_eq!(map.weight, 0.9);
    }

    #[test]
    fn inflated_cell_wins() {
        let mut cells: Vec<PosteriorCell> = (1..=5)
            .flat_map(|s| (1..=5).map(move |r| (s as f64, r as f64)))
            .map(|(s, r)| PosteriorCell::from_weight(params(s, r), 0.01 * s + 0.001 * r))
            .collect();
        cells[17].weight = 50.0;
        cells[17].log_score = 50.0_f64.ln();
        let target = cells[17].params;

        let map = select_map(cells).unwrap();
        assert_eq!(map.params, target);
        assert_eq!(map.weight, 50.0);
    }

    #[test]
    fn ties_resolve_to_smallest_shape_then_rate() {
        let cells = vec![
            PosteriorCell::from_weight(params(3.0, 1.0), 0.5),
            PosteriorCell::from_weight(params(2.0, 4.0), 0.5),
            PosteriorCell::from_weight(params(2.0, 3.0), 0.5),
            PosteriorCell::from_weight(params(1.0, 9.0), 0.1),
        ];
        let map = select_map(cells).unwrap();
        assert_eq!(map.params, params(2.0, 3.0));
    }

    #[test]
    fn empty_grid_is_an_error() {
        let err = select_map(Vec::new()).unwrap_err();
        assert_eq!(err, EstimationError::EmptyGrid);
    }

    #[test]
    fn underflowed_weights_still_order_by_log_score() {
        let mut low = PosteriorCell::from_weight(params(1.0, 1.0), 0.0);
        low.log_score = -2000.0;
        let mut high = PosteriorCell::from_weight(params(2.0, 1.0), 0.0);
        high.log_score = -1500.0;
        let map = select_map(vec![high, low]).unwrap();
        assert_eq!(map.params, params(2.0, 1.0));
        assert_eq!(map.weight, 0.0);
    }

    #[test]
    fn all_zero_likelihood_is_degenerate() {
        let cells = vec![
            PosteriorCell::from_weight(params(1.0, 1.0), 0.0),
            PosteriorCell::from_weight(params(2.0, 1.0), 0.0),
        ];
        match select_map(cells).unwrap_err() {
            EstimationError::DegenerateSample { reason } => {
                assert!(reason.contains("positive likelihood"), "{reason}")
            }
            other => panic!("unexpected {other:?}"),
        }

        // One cell with support is enough.
        let cells = vec![
            PosteriorCell::from_weight(params(1.0, 1.0), 0.0),
            PosteriorCell::from_weight(params(2.0, 1.0), 1e-30),
        ];
        assert_eq!(select_map(cells).unwrap().params, params(2.0, 1.0));
    }

    #[test]
    fn nan_scores_are_skipped() {
        let mut bad = PosteriorCell::from_weight(params(1.0, 1.0), 0.2);
        bad.log_score = f64::NAN;
        let good = PosteriorCell::from_weight(params(5.0, 1.0), 0.2);
        let map = select_map(vec![bad, good]).unwrap();
        assert_eq!(map.params, params(5.0, 1.0));

        let mut only_bad = bad;
        only_bad.weight = f64::NAN;
        assert!(matches!(
            select_map(vec![only_bad]),
            Err(EstimationError::DegenerateSample { .. })
        ));
    }
}
