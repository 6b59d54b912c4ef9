//! Sample moments and evenly spaced grids.

/// Arithmetic mean of `values`. NaN for empty input.
pub fn sample_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by `n`, not `n - 1`). NaN for empty input.
///
/// Two-pass: the mean is subtracted before squaring to avoid the
/// cancellation of the `E[x²] - E[x]²` form.
pub fn population_variance(values: &[f64]) -> f64 {
    let mean = sample_mean(values);
    if mean.is_nan() {
        return f64::NAN;
    }
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64
}

/// `count` evenly spaced values from `start` to `stop`, both inclusive.
///
/// A single point yields `[start]`; zero points yield an empty vector. The
/// last element is pinned to `stop` exactly.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut out: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            out[count - 1] = stop;
            out
        }
    }
}
