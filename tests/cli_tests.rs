use assert_cmd::Command;
use tempfile::tempdir;

const FAST: [&str; 6] = [
    "--warmup",
    "0",
    "--measurement",
    "1",
    "--iteration-ms",
    "5",
];

fn latencygate() -> Command {
    let mut cmd = Command::cargo_bin("latencygate").expect("binary");
    cmd.env_remove("LATENCYGATE_PACKAGE")
        .env_remove("LATENCYGATE_RESULTS_FILE");
    cmd
}

#[test]
fn test_help_prints_usage() {
    let output = latencygate().arg("--help").output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("Usage: latencygate"));
}

#[test]
fn test_list_shows_declarations_with_thresholds() {
    let output = latencygate()
        .args(["list", "--package", "latencygate::demo"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("latencygate::demo::latency::sort_values mode=avgt"));
    assert!(stdout.contains("latencygate::demo::latency::render_report"));
    assert!(stdout.contains("enabled=false"));
    assert!(stdout.contains("latencygate::demo::throughput::stream_checksum mode=thrpt"));
}

#[test]
fn test_latency_package_passes() {
    let dir = tempdir().expect("tempdir");
    let results = dir.path().join("results.json");
    let output = latencygate()
        .arg("run")
        .args(FAST)
        .args(["--results", results.to_str().expect("path")])
        .output()
        .expect("run");
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(output.status.success(), "stdout: {stdout}");
    assert_eq!(stdout.lines().filter(|l| l.starts_with("==OK==")).count(), 3);
    assert!(!stdout.contains("render_report"));
    assert!(stdout.contains("3 passed, 0 failed, 1 skipped"));
    let recorded = std::fs::read_to_string(results).expect("results");
    assert!(recorded.contains("latencygate::demo::latency::sort_values"));
}

#[test]
fn test_throughput_package_exits_with_failure() {
    let output = latencygate()
        .args(["run", "--package", "latencygate::demo::throughput"])
        .args(FAST)
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.starts_with("==FAILED== latencygate::demo::throughput::stream_checksum"));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("1 of 1 soft assertions failed"));
}

#[test]
fn test_flag_overrides_invalid_environment_value() {
    let output = latencygate()
        .env("LATENCYGATE_FORKS", "0")
        .args(["list", "--forks", "1"])
        .output()
        .expect("run");
    assert!(output.status.success(), "{:?}", output);
    let output = latencygate()
        .env("LATENCYGATE_FORKS", "0")
        .arg("list")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_usage_error_exits_with_two() {
    let output = latencygate().arg("--forks").output().expect("run");
    assert_eq!(output.status.code(), Some(2));
    let output = latencygate().args(["--forks", "0"]).output().expect("run");
    assert_eq!(output.status.code(), Some(2));
}
