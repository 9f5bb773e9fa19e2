//! Implementation of the `remstate show` command.
//!
//! Displays a summary of the stored snapshot: serial, lineage, content sizes
//! and content hash.

use anyhow::{Context, Result};
use serde::Serialize;

use remstate_lib::config::BackendConfig;

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success, truncate_hash};

#[derive(Debug, Serialize)]
struct StateSummary {
  location: String,
  found: bool,
  serial: u64,
  lineage: Option<String>,
  resources: usize,
  outputs: usize,
  content_hash: String,
}

pub fn cmd_show(config: &BackendConfig, output: OutputFormat) -> Result<()> {
  let mut state = config.open().context("Failed to open backend")?;
  let found = state.refresh().context("Failed to refresh state")?;

  let snapshot = state.read();
  let summary = StateSummary {
    location: config.location(),
    found,
    serial: snapshot.serial,
    lineage: snapshot.lineage.clone(),
    resources: snapshot.resources.len(),
    outputs: snapshot.outputs.len(),
    content_hash: snapshot.content_hash().context("Failed to hash state")?.0,
  };

  if output.is_json() {
    return print_json(&summary);
  }

  if !summary.found {
    print_info(&format!("No state found at {}", summary.location));
    return Ok(());
  }

  print_success(&format!("State at {}", summary.location));
  print_stat("Serial", &summary.serial.to_string());
  print_stat("Lineage", summary.lineage.as_deref().unwrap_or("(none)"));
  print_stat("Resources", &summary.resources.to_string());
  print_stat("Outputs", &summary.outputs.to_string());
  print_stat("Content", truncate_hash(&summary.content_hash));

  Ok(())
}
