// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! End-to-end tests for the `tessel` binary.

#![allow(missing_docs)]
#![allow(clippy::expect_used)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `tessel` bound to a throwaway config directory.
fn tessel(config: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tessel").expect("binary built");
    cmd.arg("--config-dir").arg(config.path());
    cmd
}

#[test]
fn plan_prints_horizontal_bands() {
    let config = TempDir::new().expect("tempdir");
    tessel(&config)
        .args(["plan", "--width", "10", "--height", "4", "--strategy", "horizontal", "-p", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[6, 10) x [0, 4)"))
        .stdout(predicate::str::contains("3 regions, 40 of 40 cells covered"));
}

#[test]
fn plan_json_lists_regions() {
    let config = TempDir::new().expect("tempdir");
    let output = tessel(&config)
        .args([
            "plan", "--width", "107", "--height", "100", "--strategy", "window", "--size", "10",
            "--json",
        ])
        .output()
        .expect("run tessel");
    assert!(output.status.success());

    let dump: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(dump["strategy"]["kind"], "window");
    assert_eq!(dump["regions"].as_array().map(Vec::len), Some(100));
    assert_eq!(dump["covered_cells"], 10_000);
}

#[test]
fn plan_run_reports_fan_out() {
    let config = TempDir::new().expect("tempdir");
    tessel(&config)
        .args([
            "plan", "--width", "20", "--height", "20", "--strategy", "per-cell", "--run", "-p",
            "4", "--max-threads", "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ran 400 regions on 2 workers"))
        .stdout(predicate::str::contains("400 cells visited"));
}

#[test]
fn plan_summary_saturates_on_huge_domains() {
    let config = TempDir::new().expect("tempdir");
    let max = usize::MAX.to_string();
    tessel(&config)
        .args(["plan", "--width", &max, "--height", "2", "--strategy", "horizontal", "-p", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "1 regions, {max} of {max} cells covered"
        )));
}

#[test]
fn zero_parallel_fails_fast() {
    let config = TempDir::new().expect("tempdir");
    tessel(&config)
        .args([
            "plan", "--width", "10", "--height", "10", "--strategy", "grid", "--size", "3", "-p",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parallel must be at least 1"));
}

#[test]
fn demos_match_sequential_twins() {
    let config = TempDir::new().expect("tempdir");
    for demo in [
        vec!["count-windows", "--seed", "7"],
        vec!["spectrum", "--width", "60", "--height", "40", "--size", "7"],
        vec!["around", "--width", "30", "--height", "20", "--radius", "2"],
    ] {
        tessel(&config)
            .args(&demo)
            .args(["-p", "4"])
            .assert()
            .success()
            .stdout(predicate::str::contains("match: true"));
    }
}

#[test]
fn gray_converts_png() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    image::RgbImage::from_fn(16, 9, |x, y| image::Rgb([(x * 15) as u8, (y * 25) as u8, 90]))
        .save(&input)
        .expect("write input");

    tessel(&dir)
        .arg("gray")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--check", "-p", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(16x9)"));

    let gray = image::open(&output).expect("read output").to_luma8();
    assert_eq!(gray.dimensions(), (16, 9));
}

#[test]
fn config_set_persists_defaults() {
    let config = TempDir::new().expect("tempdir");
    tessel(&config)
        .args(["config", "set", "-p", "5", "--log-level", "info"])
        .assert()
        .success();

    tessel(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"parallel\": 5"))
        .stdout(predicate::str::contains("\"log_level\": \"info\""));

    // Stored budget applies when no flag is given.
    tessel(&config)
        .args(["plan", "--width", "10", "--height", "1", "--strategy", "horizontal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 regions"));
}
