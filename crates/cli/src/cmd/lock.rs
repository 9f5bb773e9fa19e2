//! Implementation of the `remstate lock` and `remstate unlock` commands.

use anyhow::{Context, Result};

use remstate_lib::config::BackendConfig;

use crate::output::{print_success, print_warning};

pub fn cmd_lock(config: &BackendConfig, reason: &str) -> Result<()> {
  let state = config.open().context("Failed to open backend")?;

  if !state.supports_locking() {
    print_warning("Backend does not support locking; nothing was locked");
    return Ok(());
  }

  state.lock(reason).context("Failed to lock state")?;
  print_success(&format!("Locked state at {}", config.location()));
  Ok(())
}

pub fn cmd_unlock(config: &BackendConfig) -> Result<()> {
  let state = config.open().context("Failed to open backend")?;

  if !state.supports_locking() {
    print_warning("Backend does not support locking; nothing to unlock");
    return Ok(());
  }

  state.unlock().context("Failed to unlock state")?;
  print_success(&format!("Unlocked state at {}", config.location()));
  Ok(())
}
