//! End-to-end estimation scenarios on fixed data.

use pdi_core::config::{EstimationConfig, InitialEstimate};
use pdi_core::diagram::parse_diagram;
use pdi_core::estimate::{
    fit_diagram, fit_marginal, point_estimate, select_map, EstimationError, GammaParams,
    PosteriorCell, PosteriorGrid,
};

fn params(shape: f64, rate: f64) -> GammaParams {
    GammaParams::new(shape, rate).unwrap()
}

/// Sample drawn around Gamma(4, 2): mean ≈ 1.91, variance ≈ 0.60.
fn gamma_4_2_sample() -> Vec<f64> {
    vec![
        1.21, 2.35, 0.87, 1.64, 3.02, 2.11, 1.47, 0.95, 2.78, 1.83, 2.44, 1.12, 3.61, 1.95, 0.71,
        2.26, 1.58, 2.97, 1.34, 2.05,
    ]
}

/// Forty pairs with creation near 10 and destruction near 4, plus one
/// essential class and comments.
fn diagram_text() -> String {
    let mut text = String::from("# dimension 0\n0 inf\n");
    for i in 0..40 {
        let creation = 6.0 + 0.23 * ((i * 7) % 37) as f64;
        let destruction = 2.5 + 0.09 * ((i * 11) % 41) as f64;
        text.push_str(&format!("{creation:.4} {destruction:.4}\n"));
    }
    text
}

#[test]
fn point_estimate_of_one_to_five() {
    let p = point_estimate(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    assert!((p.shape() - 4.5).abs() < 1e-12);
    assert!((p.rate() - 1.5).abs() < 1e-12);
}

#[test]
fn empty_sample_is_degenerate() {
    assert!(matches!(
        point_estimate(&[]),
        Err(EstimationError::DegenerateSample { .. })
    ));
}

#[test]
fn two_cell_map() {
    let map = select_map([
        PosteriorCell::from_weight(params(1.0, 1.0), 0.3),
        PosteriorCell::from_weight(params(2.0, 2.0), 0.9),
    ])
    .unwrap();
    assert_eq!(map.params, params(2.0, 2.0));
    assert_eq!(map.weight, 0.9);
}

#[test]
fn generating_cell_outscores_far_cells() {
    let mut grid = PosteriorGrid::new(&[1.0, 4.0, 16.0], &[0.5, 2.0, 8.0]).unwrap();
    grid.accumulate(&gamma_4_2_sample()).unwrap();

    let near = grid.cell(1, 1).unwrap();
    assert_eq!(near.params, params(4.0, 2.0));
    for far in [grid.cell(2, 0).unwrap(), grid.cell(0, 2).unwrap()] {
        assert!(
            near.log_score > far.log_score,
            "{} scored {} vs {}",
            far.params,
            far.log_score,
            near.log_score
        );
    }
    assert_eq!(grid.map_estimate().unwrap().params, params(4.0, 2.0));
}

#[test]
fn diagram_fit_with_method_of_moments() {
    let diagram = parse_diagram(&diagram_text()).unwrap();
    assert_eq!(diagram.len(), 40);
    assert_eq!(diagram.dropped_infinite, 1);

    let config = EstimationConfig::default();
    let fit = fit_diagram(&diagram, &config).unwrap();
    assert_eq!(fit.creation.prior_range.len(), 10);
    assert_eq!(fit.creation.posterior.len(), 100);
    assert_eq!(fit.creation.observations_used, 40);

    // The MAP mean stays near the sample mean.
    let creation_mean = diagram.creation_values().iter().sum::<f64>() / 40.0;
    assert!((fit.creation.map.params.mean() - creation_mean).abs() < 0.25 * creation_mean);

    let mesh = fit.surface(&diagram, config.sample_cap);
    assert_eq!(mesh.dims(), (40, 40));
    let joint = fit.intensity();
    assert_eq!(mesh.values[10][20], joint.evaluate(mesh.xs[20], mesh.ys[10]));
}

#[test]
fn diagram_fit_with_fixed_initials() {
    let diagram = parse_diagram(&diagram_text()).unwrap();
    let config = EstimationConfig {
        grid_resolution: 11,
        ..EstimationConfig::with_fixed_initials()
    };
    let fit = fit_diagram(&diagram, &config).unwrap();

    assert_eq!(fit.creation.point_estimate, params(7.0, 0.7));
    assert_eq!(fit.destruction.point_estimate, params(8.0, 1.9));
    assert_eq!(fit.creation.initial_method, "fixed");
    let mid = fit.destruction.prior_range.midpoint().unwrap();
    assert!((mid.shape() - 8.0).abs() < 1e-9);
}

#[test]
fn sample_cap_limits_likelihood_only() {
    let sample = gamma_4_2_sample();
    let config = EstimationConfig {
        sample_cap: 8,
        ..EstimationConfig::default()
    };
    let fit = fit_marginal(&sample, &InitialEstimate::MethodOfMoments, &config).unwrap();
    assert_eq!(fit.observations_used, 8);
    assert_eq!(fit.prior_range.sample_size, 20);

    let full = point_estimate(&sample).unwrap();
    assert_eq!(fit.point_estimate, full);
}

#[test]
fn too_small_sample_rejects_negative_candidates() {
    // n = 3 makes the lower variance candidate negative.
    let err = fit_marginal(
        &[1.0, 2.0, 4.0],
        &InitialEstimate::MethodOfMoments,
        &EstimationConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EstimationError::InvalidParameter { .. }));
}

#[test]
fn negative_observation_has_no_map() {
    // The mean stays positive, so the prior range is valid, but no Gamma
    // candidate has support at -0.5.
    let mut sample: Vec<f64> = (0..40)
        .map(|i| 6.0 + 0.23 * ((i * 7) % 37) as f64)
        .collect();
    sample[3] = -0.5;

    let err = fit_marginal(
        &sample,
        &InitialEstimate::MethodOfMoments,
        &EstimationConfig::default(),
    )
    .unwrap_err();
    match err {
        EstimationError::DegenerateSample { reason } => {
            assert!(reason.contains("positive likelihood"), "{reason}")
        }
        other => panic!("unexpected {other:?}"),
    }
}
