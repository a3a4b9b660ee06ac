use assert_cmd::Command;

fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

#[test]
fn no_args() {
    cmd().assert().failure().stderr(
        "\
error: the following required arguments were not provided:
  <EXPR>

Usage: plotme <EXPR>

For more information, try \'--help\'.
",
    );
}

#[test]
fn invalid_range() {
    cmd()
        .args(["x", "--xmin=5", "--xmax=5"])
        .assert()
        .failure()
        .stderr(
            "\
Error:   × invalid x range (requires finite xmin < xmax)

",
        );
}

#[test]
fn unknown_identifier() {
    cmd().arg("q * x + c").assert().failure().stderr(
        "\
Error:   × parsing \'q * x + c\' failed
  ╰─▶ unknown identifier \'q\'

",
    );
}

#[test]
fn near_miss_suggestion() {
    cmd().arg("sqr(2*x)").assert().failure().stderr(
        "\
Error:   × parsing \'sqr(2*x)\' failed
  ╰─▶ unknown function \'sqr\' (did you mean \'sqrt\'?)

",
    );
}

#[test]
fn malformed_syntax() {
    cmd().arg("x +* 2").assert().failure().stderr(
        "\
Error:   × parsing \'x +* 2\' failed
  ╰─▶ unexpected \'*\'

",
    );
}

#[test]
fn empty_expression() {
    cmd().arg("").assert().failure().stderr(
        "\
Error:   × parsing \'\' failed
  ╰─▶ empty expression

",
    );
}

#[test]
fn export_to_missing_dir() {
    cmd()
        .args(["x", "--export", "no-such-dir/samples.csv"])
        .assert()
        .failure()
        .stderr(
            "\
Error:   × failed to write samples to \'no-such-dir/samples.csv\'
  ╰─▶ No such file or directory (os error 2)

",
        );
}
