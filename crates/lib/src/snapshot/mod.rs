//! Snapshot model for remote state.
//!
//! A [`Snapshot`] is the single document persisted by
//! [`RemoteState`](crate::remote::RemoteState): a serial number, a lineage
//! identifier and the resource/output content.

mod reconcile;
mod types;

pub use reconcile::{Reconciliation, SerialOverflow};
pub use types::Snapshot;
