//! Uniform-grid sampling.

/// Evaluate `f` on `n + 1` evenly spaced points from `xmin` to `xmax`
/// inclusive.
///
/// Non-finite values are kept in place so consumers can see where the
/// function leaves its domain.
pub fn sample(f: impl Fn(f64) -> f64, xmin: f64, xmax: f64, n: usize) -> Vec<(f64, f64)> {
    let step = (xmax - xmin) / n as f64;
    (0..=n)
        .map(|i| {
            let x = xmin + i as f64 * step;
            (x, f(x))
        })
        .collect()
}

/// Split samples into maximal runs of finite values, the segments a renderer
/// draws without connecting across poles or domain gaps. Single-point runs
/// are kept.
pub fn polyline(samples: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for &(x, y) in samples {
        if y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}
