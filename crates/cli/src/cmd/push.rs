//! Implementation of the `remstate push` command.
//!
//! Writes a snapshot file to the backend under the state lock:
//! lock → refresh → write → persist → unlock.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use remstate_lib::RemoteState;
use remstate_lib::codec::{JsonCodec, StateCodec};
use remstate_lib::config::BackendConfig;
use remstate_lib::snapshot::Snapshot;

use crate::output::{print_error, print_stat, print_success, print_warning};

pub fn cmd_push(config: &BackendConfig, file: &Path, reason: &str, lock: bool) -> Result<()> {
  let data = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
  let snapshot = JsonCodec
    .decode(&data)
    .with_context(|| format!("Invalid snapshot file {}", file.display()))?;

  let mut state = config.open().context("Failed to open backend")?;

  if lock {
    if !state.supports_locking() {
      print_warning("Backend does not support locking; pushing without a lock");
    }
    state.lock(reason).context("Failed to lock state")?;
  }

  let result = push_snapshot(&mut state, snapshot);

  if lock && let Err(e) = state.unlock() {
    if result.is_ok() {
      return Err(e).context("Failed to unlock state");
    }
    print_error(&format!("Failed to unlock state: {}", e));
  }

  let persisted = result?;
  info!(serial = persisted.serial, "push complete");

  print_success(&format!("Pushed state to {}", config.location()));
  print_stat("Serial", &persisted.serial.to_string());
  print_stat("Lineage", persisted.lineage.as_deref().unwrap_or("(none)"));
  Ok(())
}

fn push_snapshot(state: &mut RemoteState, snapshot: Snapshot) -> Result<Snapshot> {
  state.refresh().context("Failed to refresh state")?;
  state.write(snapshot);
  state.persist().context("Failed to persist state")?;
  Ok(state.read())
}
