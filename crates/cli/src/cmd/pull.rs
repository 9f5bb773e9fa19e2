//! Implementation of the `remstate pull` command.
//!
//! Refreshes from the backend and prints the stored snapshot.

use anyhow::{Context, Result};

use remstate_lib::codec::{JsonCodec, StateCodec};
use remstate_lib::config::BackendConfig;

use crate::output::{OutputFormat, print_info, print_json};

pub fn cmd_pull(config: &BackendConfig, output: OutputFormat) -> Result<()> {
  let mut state = config.open().context("Failed to open backend")?;
  let found = state.refresh().context("Failed to refresh state")?;

  if !found {
    if output.is_json() {
      return print_json(&serde_json::Value::Null);
    }
    print_info(&format!("No state found at {}", config.location()));
    return Ok(());
  }

  let snapshot = state.read();
  if output.is_json() {
    return print_json(&snapshot);
  }

  let encoded = JsonCodec.encode(&snapshot).context("Failed to encode state")?;
  print!("{}", String::from_utf8_lossy(&encoded));
  Ok(())
}
