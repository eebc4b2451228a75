//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the schlint-cli binary (finds it in target/debug when run via cargo test).
fn schlint_cli() -> Command {
    cargo_bin_cmd!("schlint-cli")
}

/// Path to schlint library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("schlint")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = schlint_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("KiCad"));
}

#[test]
fn test_cli_version() {
    let mut cmd = schlint_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_lint_prints_warning() {
    let mut cmd = schlint_cli();
    let path = fixtures_dir().join("reset_supervisor.sch");

    cmd.arg("lint").arg(path).arg("--no-color");

    cmd.assert()
        .success()
        .stdout("Warning: Maybe missing prefix \"SYS_\" on \"RESET\"\n");
}

#[test]
fn test_cli_lint_clean_file() {
    let mut cmd = schlint_cli();
    let path = fixtures_dir().join("no_labels.sch");

    cmd.arg("lint").arg(path).arg("--no-color");

    cmd.assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_fail_on_warning() {
    let mut cmd = schlint_cli();
    let path = fixtures_dir().join("reset_supervisor.sch");

    cmd.arg("lint").arg(&path).arg("--fail-on-warning");
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("Maybe missing prefix"));

    let mut cmd = schlint_cli();
    cmd.arg("lint")
        .arg(fixtures_dir().join("no_labels.sch"))
        .arg("--fail-on-warning");
    cmd.assert().code(0);
}

#[test]
fn test_cli_lint_parse_error() {
    let mut cmd = schlint_cli();
    let path = fixtures_dir().join("bad_field.sch");

    cmd.arg("lint").arg(path);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("line 8"));
}

#[test]
fn test_cli_lint_nonexistent_file() {
    let mut cmd = schlint_cli();

    cmd.arg("lint").arg("does_not_exist.sch");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_lint_json_output() {
    let mut cmd = schlint_cli();
    let path = fixtures_dir().join("reset_supervisor.sch");

    cmd.arg("lint").arg(path).arg("--format").arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["summary"]["warnings"], 1);
    assert_eq!(
        json["results"][0]["issues"][0]["message"],
        "Maybe missing prefix \"SYS_\" on \"RESET\""
    );
}

#[test]
fn test_cli_github_format() {
    let mut cmd = schlint_cli();
    let path = fixtures_dir().join("reset_supervisor.sch");

    cmd.arg("lint").arg(path).arg("--format").arg("github");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("::warning file="))
        .stdout(predicate::str::contains("Maybe missing prefix"));
}

#[test]
fn test_cli_rule_filter() {
    let mut cmd = schlint_cli();
    let path = fixtures_dir().join("reset_supervisor.sch");

    cmd.arg("lint").arg(path).arg("--rule").arg("nothing");

    cmd.assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_project_command() {
    let mut cmd = schlint_cli();
    let dir = fixtures_dir().join("project");

    cmd.arg("project").arg(dir).arg("--no-color");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("main.sch"))
        .stdout(predicate::str::contains("Maybe missing prefix \"VCC_\" on \"3V3\""));
}

#[test]
fn test_cli_rules_command() {
    let mut cmd = schlint_cli();

    cmd.arg("rules");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("missing_prefix"));
}

#[test]
fn test_cli_rules_verbose() {
    let mut cmd = schlint_cli();

    cmd.arg("rules").arg("--verbose");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SYS_RESET"));
}

#[test]
fn test_cli_cpl_command() {
    let mut cmd = schlint_cli();

    cmd.arg("cpl")
        .arg(fixtures_dir().join("board_bom.csv"))
        .arg(fixtures_dir().join("board.pos"));

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("Ref,PosX,PosY,Rot,Side\n"))
        .stdout(predicate::str::contains("R2,118.0000,-78.5000,180.0000,bottom"))
        .stdout(predicate::str::contains("FID1").not());
}

#[test]
fn test_cli_bom_command() {
    let mut cmd = schlint_cli();

    cmd.arg("bom")
        .arg(fixtures_dir().join("board_bom.csv"))
        .arg(fixtures_dir().join("board.pos"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Customer Supplied"))
        .stdout(predicate::str::contains("\"Resistor, 10k 0402\",R1 R2,2,No"));
}

#[test]
fn test_cli_cpl_missing_placement() {
    let dir = tempfile::tempdir().unwrap();
    let pos = dir.path().join("partial.pos");
    std::fs::write(&pos, "R1 10k R_0402 1 2 0 top\n").unwrap();

    let mut cmd = schlint_cli();
    cmd.arg("cpl").arg(fixtures_dir().join("board_bom.csv")).arg(&pos);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("has no placement"));
}

#[test]
fn test_cli_circle_points() {
    let mut cmd = schlint_cli();

    cmd.arg("circle").arg("10").arg("-5").arg("2").arg("--points").arg("4");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("(xy 12 -5)"))
        .stdout(predicate::function(|out: &str| out.matches("(xy ").count() == 4));
}

#[test]
fn test_cli_circle_zone() {
    let mut cmd = schlint_cli();

    cmd.arg("circle").arg("0").arg("0").arg("1").arg("--zone");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(keepout (tracks not_allowed)"));
}

#[test]
fn test_cli_circle_rejects_negative_radius() {
    let mut cmd = schlint_cli();

    cmd.arg("circle").arg("0").arg("0").arg("-1");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid radius"));
}

#[test]
fn test_cli_circle_zone_layer() {
    let mut cmd = schlint_cli();

    cmd.arg("circle")
        .arg("0")
        .arg("0")
        .arg("1")
        .arg("--zone")
        .arg("--layer")
        .arg("B.Cu");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(layer B.Cu)"))
        .stdout(predicate::str::contains("(layer F.Cu)").not());
}

#[test]
fn test_cli_rust_log_is_honoured() {
    let mut cmd = schlint_cli();
    let path = fixtures_dir().join("reset_supervisor.sch");

    cmd.env("RUST_LOG", "debug").arg("lint").arg(path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Parsing legacy schematic"));
}

#[test]
fn test_cli_quiet_without_rust_log() {
    let mut cmd = schlint_cli();
    let path = fixtures_dir().join("reset_supervisor.sch");

    cmd.env_remove("RUST_LOG").arg("lint").arg(path);

    cmd.assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_cli_debug_flag_enables_logs() {
    let mut cmd = schlint_cli();
    let path = fixtures_dir().join("reset_supervisor.sch");

    cmd.env_remove("RUST_LOG").arg("--debug").arg("lint").arg(path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Parsing legacy schematic"));
}
