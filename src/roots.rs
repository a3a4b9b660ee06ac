//! Root finding: sign-change bracketing over a sample grid, refined by
//! bisection.

use super::*;
use sample::sample;

/// A grid value this close to zero counts as an exact hit.
const EXACT_HIT: f64 = 1e-12;
/// Merge distance between an exact grid hit and an already kept root.
const GRID_MERGE: f64 = 1e-9;
/// Relative merge distance between refined roots.
const REFINED_MERGE: f64 = 1e-7;
/// Bisection iteration budget per bracket.
const MAX_STEPS: usize = 60;

/// Find roots of `f` on `[xmin, xmax]`.
///
/// The interval is scanned on a grid of `samples` steps. A grid value within
/// [`EXACT_HIT`] of zero is taken as a root directly; a sign change between
/// two finite neighbours is refined by bisection to `tol`. Grid pairs with a
/// non-finite endpoint are skipped, so sign flips across poles (such as
/// `1/x` at zero) do not produce spurious roots. Near-duplicates are merged
/// and the result is sorted ascending.
pub fn find_roots(
    f: impl Fn(f64) -> f64,
    xmin: f64,
    xmax: f64,
    samples: usize,
    tol: f64,
) -> Vec<f64> {
    let mut roots: Vec<f64> = Vec::new();
    for (a, b) in brackets(&f, xmin, xmax, samples) {
        if a == b {
            if !roots.iter().any(|r| (r - a).abs() < GRID_MERGE) {
                roots.push(a);
            }
        } else if let Some(r) = bisect(&f, a, b, tol) {
            if r.is_finite()
                && !roots
                    .iter()
                    .any(|k| (k - r).abs() < REFINED_MERGE * r.abs().max(1.0))
            {
                roots.push(r);
            }
        }
    }
    roots.sort_by(f64::total_cmp);
    roots
}

/// Scan the grid for root candidates: `(x, x)` marks an exact hit, `(a, b)`
/// a sign change between finite neighbours.
fn brackets(f: &impl Fn(f64) -> f64, xmin: f64, xmax: f64, samples: usize) -> Vec<(f64, f64)> {
    let pts = sample(f, xmin, xmax, samples);
    let mut out = Vec::new();
    for w in pts.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        if !y0.is_finite() || !y1.is_finite() {
            continue;
        }
        if y0.abs() < EXACT_HIT {
            out.push((x0, x0));
        } else if y0 * y1 < 0.0 {
            out.push((x0, x1));
        }
    }
    out
}

/// Bisect a sign-changing interval down to width `tol`.
///
/// Midpoints where `f` is non-finite shrink the interval towards themselves
/// from both sides, stepping around isolated singularities. If the budget
/// runs out the midpoint of the remaining interval is returned.
fn bisect(f: &impl Fn(f64) -> f64, a: f64, b: f64, tol: f64) -> Option<f64> {
    let (fa, fb) = (f(a), f(b));
    if !fa.is_finite() || !fb.is_finite() {
        return None;
    }
    if fa.abs() < tol {
        return Some(a);
    }
    if fb.abs() < tol {
        return Some(b);
    }
    if fa * fb > 0.0 {
        return None;
    }

    let (mut lo, mut hi, mut flo) = (a, b, fa);
    for _ in 0..MAX_STEPS {
        let mid = (lo + hi) / 2.0;
        let fm = f(mid);
        if !fm.is_finite() {
            lo = (lo + mid) / 2.0;
            hi = (hi + mid) / 2.0;
            continue;
        }
        if fm.abs() <= tol {
            return Some(mid);
        }
        if flo * fm < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            flo = fm;
        }
        if (hi - lo).abs() < tol {
            return Some((hi + lo) / 2.0);
        }
    }
    Some((lo + hi) / 2.0)
}
