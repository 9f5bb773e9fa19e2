//! Serial reconciliation between a working snapshot and its baseline.
//!
//! Before a snapshot is written back to storage its serial must be moved
//! past the baseline whenever the write diverges from what was last read,
//! so that two writers sharing a lock can never publish different documents
//! under the same serial. Identical content is never bumped, which keeps
//! repeated persists of an unchanged state free of version churn.
//!
//! # Rules
//!
//! | Working copy                                    | Result                               |
//! |-------------------------------------------------|--------------------------------------|
//! | no lineage (absent or empty)                    | new lineage, `max(serials) + 1`      |
//! | lineage differs from a baseline lineage         | `max(serials) + 1`                   |
//! | content differs, `serial <= baseline.serial`    | `baseline.serial + 1`                |
//! | content differs, serial already ahead           | unchanged                            |
//! | content identical to the baseline               | unchanged                            |
//!
//! A lineage mismatch goes past both serials rather than to
//! `baseline.serial + 1`, so a working copy that is already ahead of the
//! baseline never moves backwards.
//!
//! A bump that would overflow `u64` fails with [`SerialOverflow`] and leaves
//! the snapshot untouched.

use thiserror::Error;
use tracing::{debug, warn};

use super::types::Snapshot;

/// What reconciliation did to a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
  /// Serial and lineage left as they were.
  Unchanged,
  /// Content diverged from the baseline and the serial was bumped.
  Bumped,
  /// The snapshot had no lineage; one was assigned and the serial bumped.
  NewLineage,
  /// The lineage differs from the baseline's; the serial was bumped past both.
  LineageMismatch,
}

impl Reconciliation {
  /// Returns true if the serial was changed.
  pub fn changed_serial(self) -> bool {
    !matches!(self, Reconciliation::Unchanged)
  }
}

/// The serial is already at its maximum and cannot be bumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("state serial {serial} cannot be incremented")]
pub struct SerialOverflow {
  pub serial: u64,
}

fn next_serial(serial: u64) -> Result<u64, SerialOverflow> {
  serial.checked_add(1).ok_or(SerialOverflow { serial })
}

/// An empty lineage string counts as unset.
fn lineage_of(snapshot: &Snapshot) -> Option<&str> {
  snapshot.lineage.as_deref().filter(|lineage| !lineage.is_empty())
}

impl Snapshot {
  /// Reconcile this snapshot's serial against `baseline`.
  ///
  /// An empty baseline (no lineage) is what a first-ever run sees; only
  /// content is compared against it.
  pub fn increment_serial_maybe(
    &mut self,
    baseline: &Snapshot,
  ) -> Result<Reconciliation, SerialOverflow> {
    let outcome = match (lineage_of(self), lineage_of(baseline)) {
      (None, _) => {
        self.serial = next_serial(self.serial.max(baseline.serial))?;
        self.lineage = Some(Snapshot::generate_lineage());
        Reconciliation::NewLineage
      }
      (Some(ours), Some(theirs)) if ours != theirs => {
        warn!(
          lineage = %ours,
          baseline_lineage = %theirs,
          "snapshot lineage differs from stored state; contents will not be merged"
        );
        self.serial = next_serial(self.serial.max(baseline.serial))?;
        Reconciliation::LineageMismatch
      }
      _ => {
        if !self.same_content(baseline) && self.serial <= baseline.serial {
          self.serial = next_serial(baseline.serial)?;
          Reconciliation::Bumped
        } else {
          Reconciliation::Unchanged
        }
      }
    };

    debug!(serial = self.serial, baseline_serial = baseline.serial, ?outcome, "reconciled serial");
    Ok(outcome)
  }
}
