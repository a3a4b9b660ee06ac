use super::*;
use sample::sample;

/// Scan the sample grid for points where `f(x)` lands within `tol` of
/// `target`.
///
/// Hits closer than one and a half grid steps to an already kept hit are
/// treated as the same crossing and merged, first one wins. Non-finite
/// values never match.
pub fn find_near(
    f: impl Fn(f64) -> f64,
    xmin: f64,
    xmax: f64,
    samples: usize,
    target: f64,
    tol: f64,
) -> Vec<(f64, f64)> {
    let step = (xmax - xmin) / samples as f64;
    let eps = step * 1.5;
    let mut kept: Vec<(f64, f64)> = Vec::new();
    for (x, y) in sample(f, xmin, xmax, samples) {
        if !y.is_finite() || (y - target).abs() > tol {
            continue;
        }
        if !kept.iter().any(|&(kx, _)| (kx - x).abs() < eps) {
            kept.push((x, y));
        }
    }
    kept
}
