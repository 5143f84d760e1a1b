mod common;

use assert_cmd::prelude::*;
use common::USD_FRAGMENT;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

const PAYLOAD: &str = r#"{"baseAsset":"USD","chartData":[{"timestamp":1713260476000,"profit":"4.25412"},{"timestamp":1713269445000,"profit":"3.67900"}]}"#;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("balance-chart").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("encode"));
}

#[test]
fn render_fragment_to_svg() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chart.svg");
    let mut cmd = Command::cargo_bin("balance-chart").unwrap();
    cmd.args(["render", "--fragment", USD_FRAGMENT, "--out"])
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2 points"));
    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Profit (Price)"));
}

#[test]
fn render_payload_file_to_png() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload.json");
    fs::write(&payload, PAYLOAD).unwrap();
    let out = dir.path().join("chart.png");
    let mut cmd = Command::cargo_bin("balance-chart").unwrap();
    cmd.arg("render")
        .arg("--payload")
        .arg(&payload)
        .arg("--out")
        .arg(&out)
        .args(["--width", "400", "--height", "200", "--locale", "de"]);
    cmd.assert().success();
    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[test]
fn render_accepts_a_full_url() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chart.svg");
    let url = format!("file:///srv/balance_chart/index.html#{USD_FRAGMENT}");
    let mut cmd = Command::cargo_bin("balance-chart").unwrap();
    cmd.args(["render", "--backdrop", "none", "--fragment", &url, "--out"])
        .arg(&out);
    cmd.assert().success();
    assert!(out.exists());
}

#[test]
fn malformed_fragment_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chart.svg");
    let mut cmd = Command::cargo_bin("balance-chart").unwrap();
    cmd.args(["render", "--fragment", "%7B%zz", "--out"]).arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("malformed percent-escape"));
    assert!(!out.exists());
}

#[test]
fn unsupported_extension_fails() {
    let mut cmd = Command::cargo_bin("balance-chart").unwrap();
    cmd.args(["render", "--fragment", USD_FRAGMENT, "--out", "chart.gif"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("use .svg or .png"));
}

#[test]
fn encode_prints_the_fragment() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload.json");
    fs::write(&payload, PAYLOAD).unwrap();
    let mut cmd = Command::cargo_bin("balance-chart").unwrap();
    cmd.arg("encode")
        .arg("--payload")
        .arg(&payload)
        .args(["--url", "chart.html"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("chart.html#%7B%22baseAsset%22"));
}
