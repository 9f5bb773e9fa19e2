use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::SNAPSHOT_FORMAT_VERSION;
use crate::util::hash::{ContentHash, HashError, Hashable};

/// A versioned capture of a deployment's infrastructure state.
///
/// `serial` and `lineage` identify the snapshot's position in its history;
/// `resources` and `outputs` are the content. Two snapshots with equal
/// content but different serials are considered the same document for
/// reconciliation purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  /// Document format version.
  pub version: u32,

  /// Monotonically increasing counter within one lineage.
  pub serial: u64,

  /// History line identifier, assigned on first persist.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lineage: Option<String>,

  /// Resource address → opaque resource attributes.
  #[serde(default)]
  pub resources: BTreeMap<String, serde_json::Value>,

  /// Output name → value.
  #[serde(default)]
  pub outputs: BTreeMap<String, serde_json::Value>,
}

/// Borrowed view of the parts of a snapshot that count as content.
#[derive(Serialize)]
struct SnapshotContent<'a> {
  resources: &'a BTreeMap<String, serde_json::Value>,
  outputs: &'a BTreeMap<String, serde_json::Value>,
}

impl Hashable for SnapshotContent<'_> {}

impl Default for Snapshot {
  fn default() -> Self {
    Self {
      version: SNAPSHOT_FORMAT_VERSION,
      serial: 0,
      lineage: None,
      resources: BTreeMap::new(),
      outputs: BTreeMap::new(),
    }
  }
}

impl Snapshot {
  /// Create an empty snapshot with no lineage.
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder: set the lineage.
  pub fn with_lineage(mut self, lineage: impl Into<String>) -> Self {
    self.lineage = Some(lineage.into());
    self
  }

  /// Builder: set the serial.
  pub fn with_serial(mut self, serial: u64) -> Self {
    self.serial = serial;
    self
  }

  /// Builder: add a resource.
  pub fn with_resource(mut self, address: impl Into<String>, attributes: serde_json::Value) -> Self {
    self.resources.insert(address.into(), attributes);
    self
  }

  /// Builder: add an output.
  pub fn with_output(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
    self.outputs.insert(name.into(), value);
    self
  }

  /// Generate a fresh lineage identifier.
  pub fn generate_lineage() -> String {
    uuid::Uuid::new_v4().to_string()
  }

  /// Returns true if the snapshot carries no resources or outputs.
  pub fn is_empty(&self) -> bool {
    self.resources.is_empty() && self.outputs.is_empty()
  }

  /// Compare content only, ignoring version, serial and lineage.
  pub fn same_content(&self, other: &Snapshot) -> bool {
    self.resources == other.resources && self.outputs == other.outputs
  }

  /// SHA-256 of the canonical JSON encoding of the content.
  pub fn content_hash(&self) -> Result<ContentHash, HashError> {
    SnapshotContent {
      resources: &self.resources,
      outputs: &self.outputs,
    }
    .compute_hash()
  }
}
