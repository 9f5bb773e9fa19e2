use predicates::prelude::*;

use super::common::{SNAPSHOT_V5, TestEnv};

#[test]
fn test_pull_without_state() {
  let env = TestEnv::new();

  env
    .cmd()
    .arg("pull")
    .assert()
    .success()
    .stdout(predicate::str::contains("No state found"));
}

#[test]
fn test_pull_json_without_state_is_null() {
  let env = TestEnv::new();

  let output = env.cmd().args(["pull", "-o", "json"]).output().unwrap();
  assert!(output.status.success());
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "null");
}

#[test]
fn test_pull_prints_stored_state() {
  let env = TestEnv::new();
  std::fs::write(env.state_path(), SNAPSHOT_V5).unwrap();

  let output = env.cmd().args(["pull", "-o", "json"]).output().unwrap();
  assert!(
    output.status.success(),
    "pull failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );

  let pulled: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(pulled["serial"], 5);
  assert_eq!(pulled["resources"]["aws_instance.web"]["ami"], "ami-123");
}

#[test]
fn test_pull_corrupt_state_fails() {
  let env = TestEnv::new();
  std::fs::write(env.state_path(), "garbage data").unwrap();

  env
    .cmd()
    .arg("pull")
    .assert()
    .failure()
    .stderr(predicate::str::contains("corrupt"));
}

#[test]
fn test_show_summary() {
  let env = TestEnv::new();
  std::fs::write(env.state_path(), SNAPSHOT_V5).unwrap();

  env
    .cmd()
    .arg("show")
    .assert()
    .success()
    .stdout(predicate::str::contains("Serial"))
    .stdout(predicate::str::contains("5"))
    .stdout(predicate::str::contains("2b0c6b1e-1f43-4c4e-9a51-7d7d4c0e9a10"));
}

#[test]
fn test_show_json() {
  let env = TestEnv::new();
  std::fs::write(env.state_path(), SNAPSHOT_V5).unwrap();

  let output = env.cmd().args(["show", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(summary["found"], true);
  assert_eq!(summary["serial"], 5);
  assert_eq!(summary["resources"], 1);
  assert_eq!(summary["outputs"], 1);
  assert_eq!(summary["content_hash"].as_str().unwrap().len(), 64);
}

#[test]
fn test_explicit_backend_config() {
  let env = TestEnv::new();
  let state_file = env.write_file("elsewhere/app.tfstate", SNAPSHOT_V5);
  let config = env.write_file(
    "backend.json",
    &serde_json::json!({ "type": "local", "path": state_file }).to_string(),
  );

  let output = env
    .cmd()
    .args(["pull", "-o", "json", "--config"])
    .arg(&config)
    .output()
    .unwrap();
  assert!(output.status.success());

  let pulled: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(pulled["serial"], 5);
}

#[test]
fn test_invalid_backend_config_fails() {
  let env = TestEnv::new();
  let config = env.write_file("backend.json", r#"{"type": "ftp"}"#);

  env
    .cmd()
    .arg("pull")
    .arg("--config")
    .arg(&config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("backend config"));
}

#[test]
fn test_pull_default_document_is_found() {
  let env = TestEnv::new();
  std::fs::write(env.state_path(), r#"{"version": 1, "serial": 0}"#).unwrap();

  let output = env.cmd().args(["pull", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let pulled: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(pulled["serial"], 0);
  assert!(pulled["lineage"].is_null());
}

#[test]
fn test_show_default_document_is_found() {
  let env = TestEnv::new();
  std::fs::write(env.state_path(), r#"{"version": 1, "serial": 0}"#).unwrap();

  let output = env.cmd().args(["show", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(summary["found"], true);
  assert_eq!(summary["serial"], 0);
}
