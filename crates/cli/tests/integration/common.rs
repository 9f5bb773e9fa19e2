//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// A snapshot document at serial 5 with one resource and one output.
pub const SNAPSHOT_V5: &str = r#"{
  "version": 1,
  "serial": 5,
  "lineage": "2b0c6b1e-1f43-4c4e-9a51-7d7d4c0e9a10",
  "resources": { "aws_instance.web": { "ami": "ami-123" } },
  "outputs": { "ip": "10.0.0.1" }
}"#;

/// Same lineage and serial as [`SNAPSHOT_V5`], different resource content.
pub const SNAPSHOT_V5_CHANGED: &str = r#"{
  "version": 1,
  "serial": 5,
  "lineage": "2b0c6b1e-1f43-4c4e-9a51-7d7d4c0e9a10",
  "resources": { "aws_instance.web": { "ami": "ami-456" } },
  "outputs": { "ip": "10.0.0.1" }
}"#;

/// Isolated test environment.
///
/// Each test gets its own temporary directory with isolated state and config paths.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Write a file relative to the temp directory and return its path.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  fn dir(&self, name: &str) -> PathBuf {
    let p = self.temp.path().join(name);
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Local state file used by the default backend.
  pub fn state_path(&self) -> PathBuf {
    self.dir("state").join("default.tfstate")
  }

  /// Lock file next to the local state file.
  pub fn lock_path(&self) -> PathBuf {
    self.dir("state").join("default.tfstate.lock")
  }

  /// Read back the stored state document as JSON.
  pub fn stored_state(&self) -> serde_json::Value {
    let content = std::fs::read_to_string(self.state_path()).unwrap();
    serde_json::from_str(&content).unwrap()
  }

  /// Get a pre-configured Command for the remstate binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `REMSTATE_STATE`: Isolated local state file
  /// - `XDG_CONFIG_HOME` / `XDG_DATA_HOME`: Isolated config and data paths
  /// - `APPDATA`: Isolated data path (for Windows)
  pub fn cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("remstate");
    cmd.env("REMSTATE_STATE", self.state_path());
    cmd.env("XDG_CONFIG_HOME", self.dir("config"));
    cmd.env("XDG_DATA_HOME", self.dir("data"));
    cmd.env("APPDATA", self.dir("data"));
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
