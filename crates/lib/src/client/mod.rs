//! Storage backends for remote state.
//!
//! A backend is anything that can fetch and store one opaque document. The
//! contract:
//!
//! - [`StateClient`] moves bytes. `get` returning `Ok(None)` means no state
//!   has been stored yet, which is a normal first-run condition and not an
//!   error.
//! - [`StateLocker`] is an optional, advisory lock on the document. Backends
//!   without distributed coordination simply don't implement it.
//!
//! Implementations:
//! - [`LocalClient`]: a file on disk with a sidecar lock file
//! - [`HttpClient`]: a REST endpoint with `LOCK`/`UNLOCK` verbs
//! - [`MemoryClient`]: in-process storage for tests and embedding

mod http;
mod local;
mod memory;

use std::fmt;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::LOCK_INFO_VERSION;
use crate::util::hash::{ContentHash, hash_bytes};

pub use http::{HttpClient, HttpClientConfig};
pub use local::LocalClient;
pub use memory::MemoryClient;

/// Raw state bytes as returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
  pub data: Vec<u8>,
  /// SHA-256 of `data`.
  pub digest: ContentHash,
}

impl Payload {
  pub fn new(data: Vec<u8>) -> Self {
    let digest = hash_bytes(&data);
    Self { data, digest }
  }
}

/// Metadata describing who holds a state lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
  pub version: u32,
  pub id: String,
  pub reason: String,
  pub pid: u32,
  pub created_at_unix: u64,
  /// Location of the locked document (file path or URL).
  pub path: String,
}

impl LockInfo {
  pub fn new(reason: &str, path: impl Into<String>) -> Self {
    Self {
      version: LOCK_INFO_VERSION,
      id: uuid::Uuid::new_v4().to_string(),
      reason: reason.to_string(),
      pid: std::process::id(),
      created_at_unix: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs(),
      path: path.into(),
    }
  }
}

impl fmt::Display for LockInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} (PID {}, started Unix timestamp {}, lock ID {})",
      self.reason, self.pid, self.created_at_unix, self.id
    )
  }
}

/// Transport-level failures reported by a backend.
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("failed to read state: {0}")]
  Read(#[source] io::Error),

  #[error("failed to write state: {0}")]
  Write(#[source] io::Error),

  #[error("failed to create state directory: {0}")]
  CreateDir(#[source] io::Error),

  #[error("request to {url} failed: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{method} {url} returned HTTP {status}: {body}")]
  Status {
    method: String,
    url: String,
    status: u16,
    body: String,
  },

  #[error("backend unavailable: {0}")]
  Unavailable(String),
}

/// Failures reported by a backend's locking capability.
#[derive(Debug, Error)]
pub enum LockError {
  #[error(
    "State is locked by another process: {0}\n\
     If you're sure no other process is using it, run `remstate unlock`."
  )]
  Held(Box<LockInfo>),

  #[error(
    "State is locked (could not read lock metadata): {location}\n\
     If you're sure no other process is using it, run `remstate unlock`."
  )]
  HeldUnknown { location: String },

  #[error("State is not locked: {location}")]
  NotHeld { location: String },

  #[error("failed to access lock: {0}")]
  Io(#[source] io::Error),

  #[error("lock request to {url} failed: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{method} {url} returned HTTP {status}: {body}")]
  Status {
    method: String,
    url: String,
    status: u16,
    body: String,
  },

  #[error("lock backend unavailable: {0}")]
  Unavailable(String),
}

/// Fetches and stores the raw state document.
pub trait StateClient: Send + Sync {
  /// Fetch the stored document; `Ok(None)` if nothing has been stored yet.
  fn get(&self) -> Result<Option<Payload>, ClientError>;

  /// Replace the stored document.
  fn put(&self, data: &[u8]) -> Result<(), ClientError>;
}

/// Optional advisory locking of the stored document.
pub trait StateLocker: Send + Sync {
  fn lock(&self, reason: &str) -> Result<(), LockError>;

  fn unlock(&self) -> Result<(), LockError>;
}
