use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn test_lock_creates_lock_file() {
  let env = TestEnv::new();

  env
    .cmd()
    .args(["lock", "--reason", "maintenance"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Locked"));

  let content = std::fs::read_to_string(env.lock_path()).unwrap();
  let info: serde_json::Value = serde_json::from_str(&content).unwrap();
  assert_eq!(info["reason"], "maintenance");
  assert_eq!(info["version"], 1);
}

#[test]
fn test_lock_twice_fails() {
  let env = TestEnv::new();

  env.cmd().arg("lock").assert().success();
  env
    .cmd()
    .arg("lock")
    .assert()
    .failure()
    .stderr(predicate::str::contains("locked by another process"));
}

#[test]
fn test_unlock_removes_lock() {
  let env = TestEnv::new();

  env.cmd().arg("lock").assert().success();
  env
    .cmd()
    .arg("unlock")
    .assert()
    .success()
    .stdout(predicate::str::contains("Unlocked"));

  assert!(!env.lock_path().exists());
}

#[test]
fn test_unlock_when_not_locked_fails() {
  let env = TestEnv::new();

  env
    .cmd()
    .arg("unlock")
    .assert()
    .failure()
    .stderr(predicate::str::contains("not locked"));
}

#[test]
fn test_http_backend_without_lock_address_warns() {
  let env = TestEnv::new();
  let config = env.write_file(
    "backend.json",
    r#"{"type": "http", "address": "http://127.0.0.1:9/state"}"#,
  );

  env
    .cmd()
    .arg("lock")
    .arg("--config")
    .arg(&config)
    .assert()
    .success()
    .stderr(predicate::str::contains("does not support locking"));
}
