use super::*;
use clap::ValueEnum;
use deriv::{differentiate, numeric_derivative, DEFAULT_STEP};
use expr::compile;
use roots::find_roots;
use sample::{polyline, sample};
use serde::*;
use target::find_near;

/// Tolerance for target-value matching.
const TARGET_TOL: f64 = 1e-3;
/// Bisection tolerance for root refinement.
const ROOT_TOL: f64 = 1e-8;
/// Root scanning never uses a coarser grid than this.
const MIN_ROOT_SAMPLES: usize = 300;

/// What kind of points to locate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Default)]
pub enum Mode {
    /// Grid points where f(x) comes within tolerance of the target value.
    #[default]
    Target,
    /// Zero crossings of f.
    Zeros,
}

/// Inputs for one analysis run.
#[derive(Debug, Clone)]
pub struct Request {
    /// Expression text, with or without an `f(x) =` prefix.
    pub expr: String,
    pub xmin: f64,
    pub xmax: f64,
    /// Number of grid steps. The grid has `samples + 1` points.
    pub samples: usize,
    pub mode: Mode,
    /// Sought value of f(x). Only read in target mode.
    pub target: f64,
}

/// A located point of interest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    /// f(x)
    pub y: f64,
    /// f'(x), taken from whichever derivative is active.
    pub dy: f64,
}

/// Everything one [`analyze`] run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// The derivative expression, when the term grammar allowed an exact one.
    pub symbolic: Option<String>,
    /// f as polyline segments, broken at non-finite samples.
    pub curve: Vec<Vec<(f64, f64)>>,
    /// f' as polyline segments.
    pub derivative_curve: Vec<Vec<(f64, f64)>>,
    /// Points of interest for the requested mode.
    pub points: Vec<Point>,
    /// Suggested y-axis bounds covering both curves.
    pub y_min: f64,
    pub y_max: f64,
    /// One-line human readable summary.
    pub status: String,
    /// Raw sampled grid, `(x, f(x), f'(x))` per grid point with non-finite
    /// values preserved. Not part of the JSON form; the polyline fields
    /// carry the renderable split.
    #[serde(skip)]
    pub grid: Vec<(f64, f64, f64)>,
}

/// Run the full analysis for a request.
///
/// Compiles the expression, differentiates it (symbolically when the term
/// grammar allows, numerically otherwise), samples both curves over the
/// range and locates the requested points.
///
/// # Example
/// ```rust
/// use plotme::{analyze, Mode, Request};
///
/// let req = Request {
///     expr: "x^2 - 4".to_string(),
///     xmin: -10.0,
///     xmax: 10.0,
///     samples: 400,
///     mode: Mode::Zeros,
///     target: 0.0,
/// };
///
/// let out = analyze(&req).unwrap();
///
/// // d/dx (x^2 - 4) stays within the symbolic family
/// assert_eq!(out.symbolic.as_deref(), Some("2*x"));
///
/// // the two roots come back refined and sorted
/// assert_eq!(out.points.len(), 2);
/// assert!((out.points[0].x + 2.0).abs() < 1e-6);
/// assert!((out.points[1].x - 2.0).abs() < 1e-6);
/// assert!(out.status.starts_with("Roots detected: 2"));
/// ```
pub fn analyze(req: &Request) -> Result<Analysis> {
    ensure!(
        req.xmin.is_finite() && req.xmax.is_finite() && req.xmax > req.xmin,
        "invalid x range (requires finite xmin < xmax)"
    );
    ensure!(req.samples > 0, "sample count must be at least 1");

    let f = compile(&req.expr)?;

    // the exact derivative must itself compile, anything else falls back to
    // the central difference
    let symbolic = differentiate(&req.expr)
        .and_then(|text| compile(&text).ok().map(|compiled| (text, compiled)));
    let df = |x: f64| match &symbolic {
        Some((_, compiled)) => compiled.eval(x),
        None => numeric_derivative(|t| f.eval(t), x, DEFAULT_STEP),
    };

    let fs = sample(|x| f.eval(x), req.xmin, req.xmax, req.samples);
    let ds = sample(&df, req.xmin, req.xmax, req.samples);
    let (y_min, y_max) = y_bounds(&fs, &ds);

    let points: Vec<Point> = match req.mode {
        Mode::Target => find_near(
            |x| f.eval(x),
            req.xmin,
            req.xmax,
            req.samples,
            req.target,
            TARGET_TOL,
        )
        .into_iter()
        .map(|(x, y)| Point { x, y, dy: df(x) })
        .collect(),
        Mode::Zeros => {
            let n = req.samples.max(MIN_ROOT_SAMPLES);
            find_roots(|x| f.eval(x), req.xmin, req.xmax, n, ROOT_TOL)
                .into_iter()
                .map(|x| Point {
                    x,
                    y: f.eval(x),
                    dy: df(x),
                })
                .collect()
        }
    };

    let status = match req.mode {
        Mode::Target => format!(
            "Points found: {} (target f(x) ≈ {})",
            points.len(),
            req.target
        ),
        Mode::Zeros => format!(
            "Roots detected: {} (range {} → {})",
            points.len(),
            req.xmin,
            req.xmax
        ),
    };

    let grid = fs
        .iter()
        .zip(&ds)
        .map(|(&(x, y), &(_, dy))| (x, y, dy))
        .collect();

    Ok(Analysis {
        symbolic: symbolic.map(|(text, _)| text),
        curve: polyline(&fs),
        derivative_curve: polyline(&ds),
        points,
        y_min,
        y_max,
        status,
        grid,
    })
}

/// y-axis bounds over the finite samples of both curves, with a widening for
/// near-flat spans and a tenth of the span as padding.
fn y_bounds(fs: &[(f64, f64)], ds: &[(f64, f64)]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &(_, y) in fs.iter().chain(ds) {
        if y.is_finite() {
            lo = lo.min(y);
            hi = hi.max(y);
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        lo = -1.0;
        hi = 1.0;
    }
    if (hi - lo).abs() < 1e-9 {
        lo -= 1.0;
        hi += 1.0;
    }
    let pad = 0.1 * (hi - lo).abs().max(1.0);
    (lo - pad, hi + pad)
}
