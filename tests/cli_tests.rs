//! Binary-level CLI tests. None of these reach the container runtime.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hind(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("hind");
    cmd.env("HIND_HOME", home.path())
        .env_remove("HIND_LOGLEVEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    hind(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("stop"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_version_command() {
    let home = tempfile::tempdir().unwrap();
    hind(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("nomad"));
}

#[test]
fn test_version_json() {
    let home = tempfile::tempdir().unwrap();
    let output = hind(&home).args(["--json", "version"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["command"], "version");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(value["naming_scheme"], 1);
}

#[test]
fn test_list_without_clusters() {
    let home = tempfile::tempdir().unwrap();
    hind(&home)
        .args(["--color", "never", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No clusters found"));
}

#[test]
fn test_list_json_without_clusters() {
    let home = tempfile::tempdir().unwrap();
    let output = hind(&home).args(["--json", "ls"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["clusters"], serde_json::json!([]));
}

#[test]
fn test_get_unknown_cluster_fails() {
    let home = tempfile::tempdir().unwrap();
    hind(&home)
        .args(["get", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cluster 'ghost' not found"));
}

#[test]
fn test_stop_unknown_cluster_fails() {
    let home = tempfile::tempdir().unwrap();
    hind(&home)
        .args(["stop", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_set_profile_requires_existing_cluster() {
    let home = tempfile::tempdir().unwrap();
    hind(&home)
        .args(["set", "profile", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_set_profile_writes_pointer() {
    let home = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(home.path().join("cluster").join("lab")).unwrap();

    hind(&home)
        .args(["set", "profile", "lab"])
        .assert()
        .success();

    let pointer = std::fs::read_to_string(home.path().join("cluster").join("active")).unwrap();
    assert_eq!(pointer, "lab");
}

#[test]
fn test_invalid_settings_are_reported() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        "[runtime]\nprovider = \"kubernetes\"\n",
    )
    .unwrap();

    hind(&home)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("runtime.provider"));
}

#[test]
fn test_invalid_timeout_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    hind(&home)
        .args(["start", "--timeout", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout"));
}
