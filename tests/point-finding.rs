use plotme::{analyze, compile, find_near, find_roots, polyline, sample, Mode, Request};

fn req(expr: &str, mode: Mode) -> Request {
    Request {
        expr: expr.to_string(),
        xmin: -10.0,
        xmax: 10.0,
        samples: 400,
        mode,
        target: 0.0,
    }
}

#[test]
fn sampling_grid() {
    let pts = sample(|x| x * 2.0, 0.0, 10.0, 10);
    assert_eq!(pts.len(), 11);
    assert_eq!(pts[0], (0.0, 0.0));
    assert_eq!(pts[3], (3.0, 6.0));
    assert_eq!(pts[10], (10.0, 20.0));
}

#[test]
fn polyline_breaks_at_poles() {
    let f = compile("1/x").unwrap();
    // x = -2, -1, 0, 1, 2 with f(0) infinite
    let pts = sample(|x| f.eval(x), -2.0, 2.0, 4);
    let segs = polyline(&pts);
    assert_eq!(segs.len(), 2);
    assert_eq!(segs[0], vec![(-2.0, -0.5), (-1.0, -1.0)]);
    assert_eq!(segs[1], vec![(1.0, 1.0), (2.0, 0.5)]);
}

#[test]
fn polyline_keeps_singletons() {
    let pts = vec![(0.0, f64::NAN), (1.0, 1.0), (2.0, f64::NAN), (3.0, 3.0)];
    let segs = polyline(&pts);
    assert_eq!(segs, vec![vec![(1.0, 1.0)], vec![(3.0, 3.0)]]);
}

#[test]
fn roots_of_a_parabola() {
    let f = compile("x^2 - 4").unwrap();
    let roots = find_roots(|x| f.eval(x), -10.0, 10.0, 400, 1e-8);
    assert_eq!(roots.len(), 2);
    assert!((roots[0] + 2.0).abs() < 1e-6);
    assert!((roots[1] - 2.0).abs() < 1e-6);
}

#[test]
fn exact_grid_hit() {
    let roots = find_roots(|x| x - 5.0, 0.0, 10.0, 10, 1e-8);
    assert_eq!(roots, vec![5.0]);
}

#[test]
fn no_roots() {
    let f = compile("x^2 + 1").unwrap();
    assert!(find_roots(|x| f.eval(x), -10.0, 10.0, 400, 1e-8).is_empty());
}

#[test]
fn pole_sign_change_is_not_a_root() {
    // 1/x flips sign across 0 without crossing it
    let f = compile("1/x").unwrap();
    assert!(find_roots(|x| f.eval(x), -1.0, 1.0, 2, 1e-8).is_empty());
}

#[test]
fn budget_exhaustion_returns_midpoint() {
    // every midpoint lands on the pole, so the bracket never shrinks below
    // tolerance and the exhausted budget yields its centre
    let f = compile("1/(x - 0.5)").unwrap();
    let roots = find_roots(|x| f.eval(x), 0.0, 1.0, 1, 1e-8);
    assert_eq!(roots, vec![0.5]);
}

#[test]
fn steep_crossing_width_exit() {
    // |f| stays far above tolerance, termination comes from interval width
    let roots = find_roots(|x| 1e12 * (x - 0.3), 0.0, 1.0, 1, 1e-8);
    assert_eq!(roots.len(), 1);
    assert!((roots[0] - 0.3).abs() < 1e-7);
}

#[test]
fn sine_roots_sorted_and_deduplicated() {
    let f = compile("sin(x)").unwrap();
    let roots = find_roots(|x| f.eval(x), -7.0, 7.0, 100, 1e-8);
    assert_eq!(roots.len(), 5);
    let pi = std::f64::consts::PI;
    for (r, e) in roots.iter().zip([-2.0 * pi, -pi, 0.0, pi, 2.0 * pi]) {
        assert!((r - e).abs() < 1e-6, "{r} vs {e}");
    }

    let again = find_roots(|x| f.eval(x), -7.0, 7.0, 100, 1e-8);
    assert_eq!(roots, again);
    for w in roots.windows(2) {
        assert!(w[1] > w[0]);
    }
}

#[test]
fn randomized_cubics_find_all_three_roots() {
    fastrand::seed(42);
    for _ in 0..50 {
        let r1 = fastrand::f64() * 8.0 - 4.0;
        let r2 = r1 + 0.5 + fastrand::f64() * 2.0;
        let r3 = r2 + 0.5 + fastrand::f64() * 2.0;
        let f = |x: f64| (x - r1) * (x - r2) * (x - r3);
        let roots = find_roots(f, -10.0, 10.0, 500, 1e-8);
        assert_eq!(roots.len(), 3, "roots of ({r1}, {r2}, {r3}) cubic");
        for (found, expected) in roots.iter().zip([r1, r2, r3]) {
            assert!((found - expected).abs() < 1e-5, "{found} vs {expected}");
        }
    }
}

#[test]
fn near_target_scan() {
    let f = compile("x").unwrap();
    let hits = find_near(|x| f.eval(x), 0.0, 10.0, 10, 5.0, 1e-3);
    assert_eq!(hits, vec![(5.0, 5.0)]);
}

#[test]
fn near_target_merges_adjacent_hits() {
    // a flat match everywhere keeps every other point of the unit grid
    let hits = find_near(|_| 1.0, 0.0, 10.0, 10, 1.0, 1e-3);
    assert_eq!(hits.len(), 6);
    assert_eq!(hits[0], (0.0, 1.0));
    assert_eq!(hits[1], (2.0, 1.0));
}

#[test]
fn near_target_ignores_non_finite() {
    let f = compile("sqrt(-1 - x^2)").unwrap();
    assert!(find_near(|x| f.eval(x), -1.0, 1.0, 10, 0.0, 1e9).is_empty());
}

#[test]
fn analyze_end_to_end_target() {
    let mut r = req("x^2", Mode::Target);
    r.xmin = 0.0;
    r.xmax = 10.0;
    r.samples = 10;
    r.target = 4.0;
    let out = analyze(&r).unwrap();

    assert_eq!(out.symbolic.as_deref(), Some("2*x"));
    assert_eq!(out.points.len(), 1);
    assert_eq!(out.points[0].x, 2.0);
    assert_eq!(out.points[0].y, 4.0);
    assert_eq!(out.points[0].dy, 4.0);
    assert_eq!(out.status, "Points found: 1 (target f(x) ≈ 4)");
}

#[test]
fn analyze_zeros_boosts_sampling() {
    // four steps would straddle most of the roots; the root pass upgrades
    // its own grid while the curves keep the requested one
    let mut r = req("sin(x)", Mode::Zeros);
    r.samples = 4;
    let out = analyze(&r).unwrap();

    assert_eq!(out.points.len(), 7);
    assert_eq!(out.curve.len(), 1);
    assert_eq!(out.curve[0].len(), 5);
    assert_eq!(out.status, "Roots detected: 7 (range -10 → 10)");
}

#[test]
fn analyze_validates_range_first() {
    let mut r = req("this is not an expression", Mode::Target);
    r.xmin = 5.0;
    r.xmax = 5.0;
    let err = analyze(&r).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid x range (requires finite xmin < xmax)"
    );
}

#[test]
fn analyze_rejects_zero_samples() {
    let mut r = req("x", Mode::Target);
    r.samples = 0;
    let err = analyze(&r).unwrap_err();
    assert_eq!(err.to_string(), "sample count must be at least 1");
}

#[test]
fn flat_zero_bounds_widen() {
    let out = analyze(&req("0", Mode::Target)).unwrap();
    assert_eq!(out.y_min, -1.2);
    assert_eq!(out.y_max, 1.2);
}

#[test]
fn empty_domain_bounds_fall_back() {
    let out = analyze(&req("sqrt(-1 - x^2)", Mode::Target)).unwrap();
    assert!(out.symbolic.is_none());
    assert!(out.curve.is_empty());
    assert!(out.derivative_curve.is_empty());
    assert!(out.points.is_empty());
    assert_eq!(out.y_min, -1.2);
    assert_eq!(out.y_max, 1.2);
}
