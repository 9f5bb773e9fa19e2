//! Snapshot wire encoding.
//!
//! [`RemoteState`](crate::remote::RemoteState) never looks at the bytes it
//! moves; it hands them to a [`StateCodec`]. The default [`JsonCodec`] writes
//! pretty-printed JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "serial": 6,
//!   "lineage": "0f5c2d0e-6f0a-4a9e-9d0b-1c2c3d4e5f60",
//!   "resources": { "aws_instance.web": { "ami": "ami-123" } },
//!   "outputs": { "ip": "10.0.0.1" }
//! }
//! ```

use thiserror::Error;

use crate::consts::SNAPSHOT_FORMAT_VERSION;
use crate::snapshot::Snapshot;

#[derive(Debug, Error)]
pub enum CodecError {
  #[error("state payload is empty")]
  Empty,

  #[error("failed to parse state: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("failed to serialize state: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("unsupported state version: {0}")]
  UnsupportedVersion(u32),
}

/// Converts snapshots to and from raw bytes.
pub trait StateCodec: Send + Sync {
  fn decode(&self, data: &[u8]) -> Result<Snapshot, CodecError>;

  fn encode(&self, snapshot: &Snapshot) -> Result<Vec<u8>, CodecError>;
}

/// JSON codec for the versioned snapshot format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl StateCodec for JsonCodec {
  fn decode(&self, data: &[u8]) -> Result<Snapshot, CodecError> {
    if data.iter().all(u8::is_ascii_whitespace) {
      return Err(CodecError::Empty);
    }

    let snapshot: Snapshot = serde_json::from_slice(data).map_err(CodecError::Parse)?;

    if snapshot.version != SNAPSHOT_FORMAT_VERSION {
      return Err(CodecError::UnsupportedVersion(snapshot.version));
    }

    Ok(snapshot)
  }

  fn encode(&self, snapshot: &Snapshot) -> Result<Vec<u8>, CodecError> {
    let mut data = serde_json::to_vec_pretty(snapshot).map_err(CodecError::Serialize)?;
    data.push(b'\n');
    Ok(data)
  }
}
