//! Integration tests for the `rotafacil` binary.
//!
//! Every test points `--state` at a temporary file so runs are isolated, and
//! routing tests target a closed local port so nothing leaves the machine.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct TestEnv {
    _temp_dir: TempDir,
    state_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let state_path = temp_dir.path().join("state.json");
        Self {
            _temp_dir: temp_dir,
            state_path,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("rotafacil").expect("binary exists");
        cmd.env("NO_COLOR", "1")
            .env_remove("ROTAFACIL_STATE_PATH")
            .env_remove("RUST_LOG")
            .arg("--state")
            .arg(&self.state_path);
        cmd
    }

    fn saved(&self) -> serde_json::Value {
        let text = fs::read_to_string(&self.state_path).expect("state file written");
        serde_json::from_str(&text).expect("state file is JSON")
    }
}

#[test]
fn list_on_fresh_state_shows_default_base() {
    let env = TestEnv::new();
    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Central (Base)"))
        .stdout(predicate::str::contains("No waypoints registered."));
}

#[test]
fn add_manual_and_link_waypoints_are_persisted() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "--name", "Ana", "--lat", "-2.53", "--lng", "-44.28"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added #1 Ana"));
    env.cmd()
        .args(["add", "--link", "https://maps.google.com/@-2.54,-44.29,15z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added #2 Cliente 2"));

    let saved = env.saved();
    assert_eq!(saved["clients"].as_array().map(Vec::len), Some(2));
    assert_eq!(saved["clients"][1]["lat"], -2.54);
    assert_eq!(saved["nextId"], 3);

    env.cmd()
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"waypoints\""))
        .stdout(predicate::str::contains("\"Ana\""));
}

#[test]
fn add_rejects_out_of_range_coordinates() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "--lat", "95", "--lng", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("coordinates out of range"));
    assert!(!env.state_path.exists());
}

#[test]
fn add_with_unrecognized_link_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "--link", "hello world"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not extract coordinates"));
}

#[test]
fn add_requires_coordinates() {
    let env = TestEnv::new();
    env.cmd().args(["add", "--name", "Ana"]).assert().failure();
}

#[test]
fn remove_and_clear() {
    let env = TestEnv::new();
    for lat in ["-2.51", "-2.52", "-2.53"] {
        env.cmd()
            .args(["add", "--lat", lat, "--lng", "-44.28"])
            .assert()
            .success();
    }

    env.cmd()
        .args(["remove", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed #2"));
    env.cmd()
        .args(["remove", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no waypoint with id 2"));

    let ids: Vec<_> = env.saved()["clients"]
        .as_array()
        .expect("clients array")
        .iter()
        .map(|c| c["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);

    env.cmd()
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 waypoint(s)"));
    // ids keep counting after a clear
    assert_eq!(env.saved()["nextId"], 4);
}

#[test]
fn base_can_be_moved_and_renamed() {
    let env = TestEnv::new();
    env.cmd()
        .args(["base", "--lat", "-2.6", "--lng", "-44.1", "--name", "Depósito"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Base: Depósito"));

    let saved = env.saved();
    assert_eq!(saved["base"]["name"], "Depósito");
    assert_eq!(saved["base"]["lat"], -2.6);
}

#[test]
fn extract_reports_coordinates_and_rule() {
    let env = TestEnv::new();
    env.cmd()
        .args(["extract", "-2.5, -44.3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lat: -2.5"))
        .stdout(predicate::str::contains("rule: bare_pair"));

    env.cmd()
        .args([
            "extract",
            "--format",
            "json",
            "https://www.google.com/maps/place/-2.53,-44.28",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\": \"matched\""))
        .stdout(predicate::str::contains("\"rule\": \"place_path\""));
}

#[test]
fn extract_without_coordinates_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["extract", "hello world"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("enter them manually"));
}

#[test]
fn route_without_waypoints_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--osrm-url", "http://127.0.0.1:9", "route"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one waypoint"));
}

#[test]
fn route_with_unreachable_service_reports_unavailable() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "--lat", "-2.53", "--lng", "-44.28"])
        .assert()
        .success();
    env.cmd()
        .env("ROTAFACIL_OSRM_TIMEOUT_SECS", "2")
        .args(["--osrm-url", "http://127.0.0.1:9", "route"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("routing service unavailable"));

    // the registry is untouched by a failed computation
    assert_eq!(env.saved()["clients"].as_array().map(Vec::len), Some(1));
}
