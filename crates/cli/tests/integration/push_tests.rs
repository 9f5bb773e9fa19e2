use predicates::prelude::*;

use super::common::{SNAPSHOT_V5, SNAPSHOT_V5_CHANGED, TestEnv};

#[test]
fn test_push_first_state() {
  let env = TestEnv::new();
  let file = env.write_file("input.json", SNAPSHOT_V5);

  env.cmd().arg("push").arg(&file).assert().success();

  let stored = env.stored_state();
  assert_eq!(stored["serial"], 5);
  assert_eq!(stored["lineage"], "2b0c6b1e-1f43-4c4e-9a51-7d7d4c0e9a10");
  assert!(!env.lock_path().exists());
}

#[test]
fn test_push_same_content_keeps_serial() {
  let env = TestEnv::new();
  std::fs::write(env.state_path(), SNAPSHOT_V5).unwrap();
  let file = env.write_file("input.json", SNAPSHOT_V5);

  env.cmd().arg("push").arg(&file).assert().success();

  assert_eq!(env.stored_state()["serial"], 5);
}

#[test]
fn test_push_changed_content_bumps_serial() {
  let env = TestEnv::new();
  std::fs::write(env.state_path(), SNAPSHOT_V5).unwrap();
  let file = env.write_file("input.json", SNAPSHOT_V5_CHANGED);

  env
    .cmd()
    .arg("push")
    .arg(&file)
    .assert()
    .success()
    .stdout(predicate::str::contains("6"));

  let stored = env.stored_state();
  assert_eq!(stored["serial"], 6);
  assert_eq!(stored["resources"]["aws_instance.web"]["ami"], "ami-456");
}

#[test]
fn test_push_without_lineage_assigns_one() {
  let env = TestEnv::new();
  std::fs::write(env.state_path(), SNAPSHOT_V5).unwrap();
  let file = env.write_file("input.json", r#"{"version": 1, "serial": 0, "outputs": {"x": 1}}"#);

  env.cmd().arg("push").arg(&file).assert().success();

  let stored = env.stored_state();
  assert_eq!(stored["serial"], 6);
  let lineage = stored["lineage"].as_str().unwrap();
  assert!(!lineage.is_empty());
  assert_ne!(lineage, "2b0c6b1e-1f43-4c4e-9a51-7d7d4c0e9a10");
}

#[test]
fn test_push_invalid_file_fails() {
  let env = TestEnv::new();
  let file = env.write_file("input.json", "not valid json {{{");

  env
    .cmd()
    .arg("push")
    .arg(&file)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid snapshot file"));

  assert!(!env.state_path().exists());
}

#[test]
fn test_push_missing_file_fails() {
  let env = TestEnv::new();

  env
    .cmd()
    .args(["push", "does-not-exist.json"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_push_blocked_by_lock() {
  let env = TestEnv::new();
  let file = env.write_file("input.json", SNAPSHOT_V5);

  env.cmd().args(["lock", "--reason", "deploy in progress"]).assert().success();

  env
    .cmd()
    .arg("push")
    .arg(&file)
    .assert()
    .failure()
    .stderr(predicate::str::contains("deploy in progress"));

  assert!(!env.state_path().exists());
  assert!(env.lock_path().exists());
}

#[test]
fn test_push_no_lock_ignores_lock() {
  let env = TestEnv::new();
  let file = env.write_file("input.json", SNAPSHOT_V5);

  env.cmd().arg("lock").assert().success();
  env.cmd().arg("push").arg(&file).arg("--no-lock").assert().success();

  assert_eq!(env.stored_state()["serial"], 5);
  assert!(env.lock_path().exists());
}

#[test]
fn test_push_releases_lock_on_failure() {
  let env = TestEnv::new();
  std::fs::write(env.state_path(), "garbage data").unwrap();
  let file = env.write_file("input.json", SNAPSHOT_V5);

  env.cmd().arg("push").arg(&file).assert().failure();

  assert!(!env.lock_path().exists());
}
