use assert_cmd::Command;

fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// f(x) = x on a ten step grid, looking for f(x) = 5.
fn linear() -> Command {
    let mut c = cmd();
    c.args(["f(x) = x", "--xmin=0", "--xmax=10", "-n", "10", "-t", "5"]);
    c
}

#[test]
fn vanilla() {
    linear().assert().success().stdout(
        "\
────────────────────────────
 Point   x     f(x)   f\'(x) 
════════════════════════════
 A       5.0    5.0     1.0 
────────────────────────────
  Symbolic derivative: f\'(x) = 1
  Points found: 1 (target f(x) ≈ 5)
",
    );
}

#[test]
fn vanilla_no_stats() {
    linear().arg("--no-stats").assert().success().stdout(
        "\
────────────────────────────
 Point   x     f(x)   f\'(x) 
════════════════════════════
 A       5.0    5.0     1.0 
────────────────────────────
",
    );
}

#[test]
fn plain_output() {
    linear().args(["-o", "plain"]).assert().success().stdout(
        "\
A 5 5 1
  Symbolic derivative: f\'(x) = 1
  Points found: 1 (target f(x) ≈ 5)
",
    );
}

#[test]
fn numeric_fallback_status() {
    cmd()
        .args(["x*sin(x)", "--xmin=1", "--xmax=2", "-t", "100", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            "  Symbolic derivative: none (numeric fallback)
  Points found: 0 (target f(x) ≈ 100)
",
        );
}

#[test]
fn json_output() {
    let output = cmd()
        .args(["x^2 - 4", "-m", "zeros", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let analysis: plotme::Analysis = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(analysis.symbolic.as_deref(), Some("2*x"));
    assert_eq!(analysis.points.len(), 2);
    assert!((analysis.points[0].x + 2.0).abs() < 1e-6);
    assert!((analysis.points[1].x - 2.0).abs() < 1e-6);
    assert_eq!(analysis.curve.len(), 1);
    assert_eq!(analysis.curve[0].len(), 801);
    assert!((analysis.y_min + 31.6).abs() < 1e-9);
    assert!((analysis.y_max - 107.6).abs() < 1e-9);
    assert!(analysis.status.starts_with("Roots detected: 2"));
}

#[test]
fn more_points_than_labels() {
    // a flat zero matches the zero target at every merged grid point, but
    // only A..Z rows are printed while the summary keeps the full count
    let output = cmd().args(["0", "-o", "plain"]).output().unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 28);
    assert!(lines[0].starts_with("A "));
    assert!(lines[25].starts_with("Z "));
    assert_eq!(lines[26], "  Symbolic derivative: f'(x) = 0");
    assert_eq!(lines[27], "  Points found: 401 (target f(x) ≈ 0)");
}

#[test]
fn csv_export() {
    let path = std::env::temp_dir().join(format!("plotme-export-{}.csv", std::process::id()));

    linear()
        .args(["-o", "plain"])
        .arg("--export")
        .arg(&path)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("x,f(x),f'(x)"));
    assert_eq!(lines.count(), 11);
    assert!(csv.lines().any(|l| l == "5.0,5.0,1.0"));
}
