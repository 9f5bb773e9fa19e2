//! remstate-lib: Remote state persistence for declarative deployments
//!
//! This crate provides:
//! - `Snapshot`: the versioned state document (serial, lineage, content)
//! - `RemoteState`: working copy + baseline over a storage backend
//! - `StateClient` / `StateLocker`: the backend capabilities, with local,
//!   HTTP and in-memory implementations
//! - `StateCodec`: the byte encoding of snapshots
//! - `BackendConfig`: JSON backend configuration

pub mod client;
pub mod codec;
pub mod config;
pub mod consts;
pub mod platform;
pub mod remote;
pub mod snapshot;
pub mod util;

pub use client::{ClientError, LockError, LockInfo, Payload, StateClient, StateLocker};
pub use codec::{CodecError, JsonCodec, StateCodec};
pub use config::{BackendConfig, ConfigError};
pub use remote::{RemoteState, StateError};
pub use snapshot::{Reconciliation, SerialOverflow, Snapshot};
