//! End-to-end tests of the startup sequencer binary: fail-fast ordering,
//! exit-code propagation, and the explicit dashboard bind arguments.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const ANALYSIS_BANNER: &str = "--- Running daily analysis ---";
const DASHBOARD_BANNER: &str = "--- Starting dashboard server ---";

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn run_sequencer(runner: &Path, dashboard: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_crypto-forecast"))
        .args([
            "--runner-bin",
            runner.to_str().unwrap(),
            "--dashboard-bin",
            dashboard.to_str().unwrap(),
        ])
        .output()
        .unwrap()
}

#[test]
fn successful_run_executes_both_steps_in_order() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("steps.log");
    let runner = write_script(
        tmp.path(),
        "runner.sh",
        &format!("echo analysis >> {}", log.display()),
    );
    let dashboard = write_script(
        tmp.path(),
        "dashboard.sh",
        &format!("echo dashboard >> {}", log.display()),
    );

    let output = run_sequencer(&runner, &dashboard);

    assert!(output.status.success(), "sequencer should exit 0");
    assert_eq!(fs::read_to_string(&log).unwrap(), "analysis\ndashboard\n");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.find(ANALYSIS_BANNER).expect("analysis banner");
    let second = stdout.find(DASHBOARD_BANNER).expect("dashboard banner");
    assert!(first < second, "banners must appear in step order");
}

#[test]
fn failing_analysis_aborts_with_its_exit_code() {
    let tmp = TempDir::new().unwrap();
    let marker = tmp.path().join("dashboard-ran");
    let runner = write_script(tmp.path(), "runner.sh", "exit 3");
    let dashboard = write_script(
        tmp.path(),
        "dashboard.sh",
        &format!("touch {}", marker.display()),
    );

    let output = run_sequencer(&runner, &dashboard);

    assert_eq!(output.status.code(), Some(3));
    assert!(!marker.exists(), "dashboard step must never be attempted");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(ANALYSIS_BANNER));
    assert!(!stdout.contains(DASHBOARD_BANNER));
}

#[test]
fn dashboard_exit_code_propagates() {
    let tmp = TempDir::new().unwrap();
    let runner = write_script(tmp.path(), "runner.sh", "exit 0");
    let dashboard = write_script(tmp.path(), "dashboard.sh", "exit 7");

    let output = run_sequencer(&runner, &dashboard);

    assert_eq!(output.status.code(), Some(7));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(DASHBOARD_BANNER));
}

#[test]
fn dashboard_runs_exactly_once() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("dashboard.log");
    let runner = write_script(tmp.path(), "runner.sh", "exit 0");
    let dashboard = write_script(
        tmp.path(),
        "dashboard.sh",
        &format!("echo run >> {}", log.display()),
    );

    let output = run_sequencer(&runner, &dashboard);

    assert!(output.status.success());
    assert_eq!(fs::read_to_string(&log).unwrap().lines().count(), 1);
}

#[test]
fn dashboard_receives_explicit_bind_arguments() {
    let tmp = TempDir::new().unwrap();
    let args_file = tmp.path().join("args.txt");
    let runner = write_script(tmp.path(), "runner.sh", "exit 0");
    let dashboard = write_script(
        tmp.path(),
        "dashboard.sh",
        &format!("echo \"$@\" > {}", args_file.display()),
    );

    let output = run_sequencer(&runner, &dashboard);

    assert!(output.status.success());
    let args = fs::read_to_string(&args_file).unwrap();
    assert!(args.contains("--server.address 0.0.0.0"));
    assert!(args.contains("--server.port 8501"));
}

#[test]
fn missing_runner_binary_fails_before_dashboard() {
    let tmp = TempDir::new().unwrap();
    let marker = tmp.path().join("dashboard-ran");
    let dashboard = write_script(
        tmp.path(),
        "dashboard.sh",
        &format!("touch {}", marker.display()),
    );

    let output = Command::new(env!("CARGO_BIN_EXE_crypto-forecast"))
        .args([
            "--runner-bin",
            tmp.path().join("does-not-exist").to_str().unwrap(),
            "--dashboard-bin",
            dashboard.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!marker.exists());
}
