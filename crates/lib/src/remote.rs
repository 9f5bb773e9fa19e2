//! Remote state: an in-memory working snapshot backed by a [`StateClient`].
//!
//! `RemoteState` keeps two snapshots:
//!
//! - `baseline`: the last snapshot read from storage. Only [`refresh`]
//!   sets it.
//! - `current`: the caller's working copy. [`write`] and [`refresh`] set it.
//!
//! [`persist`] reconciles `current`'s serial against `baseline` before
//! writing, but does not advance `baseline`; a later [`refresh`] does that.
//!
//! Locking is advisory and driven by the caller:
//!
//! ```ignore
//! state.lock("apply")?;
//! state.refresh()?;
//! let mut snap = state.read();
//! snap.resources.insert(addr, attrs);
//! state.write(snap);
//! state.persist()?;
//! state.unlock()?;
//! ```
//!
//! `RemoteState` does no synchronisation of its own. Share it across threads
//! by wrapping it in a `Mutex`.
//!
//! [`refresh`]: RemoteState::refresh
//! [`write`]: RemoteState::write
//! [`persist`]: RemoteState::persist

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::client::{ClientError, LockError, StateClient, StateLocker};
use crate::codec::{CodecError, JsonCodec, StateCodec};
use crate::snapshot::{SerialOverflow, Snapshot};

#[derive(Debug, Error)]
pub enum StateError {
  #[error(transparent)]
  Transport(#[from] ClientError),

  #[error("stored state is corrupt: {0}")]
  CorruptState(#[source] CodecError),

  #[error("failed to encode state: {0}")]
  Encode(#[source] CodecError),

  #[error(transparent)]
  Lock(#[from] LockError),

  #[error(transparent)]
  SerialOverflow(#[from] SerialOverflow),
}

pub struct RemoteState<C: ?Sized = dyn StateClient> {
  client: Arc<C>,
  locker: Option<Arc<dyn StateLocker>>,
  codec: Box<dyn StateCodec>,
  current: Snapshot,
  baseline: Snapshot,
}

impl<C: StateClient + 'static> RemoteState<C> {
  /// Remote state over a backend without locking.
  pub fn new(client: C) -> Self {
    Self::from_parts(Arc::new(client), None)
  }

  /// Remote state over a backend whose locking is delegated to.
  pub fn with_locker(client: C) -> Self
  where
    C: StateLocker,
  {
    let client = Arc::new(client);
    let locker: Arc<dyn StateLocker> = client.clone();
    Self::from_parts(client, Some(locker))
  }
}

impl<C: StateClient + ?Sized> RemoteState<C> {
  pub fn from_parts(client: Arc<C>, locker: Option<Arc<dyn StateLocker>>) -> Self {
    Self {
      client,
      locker,
      codec: Box::new(JsonCodec),
      current: Snapshot::default(),
      baseline: Snapshot::default(),
    }
  }

  /// Replace the codec (JSON by default).
  pub fn with_codec(mut self, codec: impl StateCodec + 'static) -> Self {
    self.codec = Box::new(codec);
    self
  }

  pub fn client(&self) -> &C {
    &self.client
  }

  /// Returns true if lock/unlock reach a backend.
  pub fn supports_locking(&self) -> bool {
    self.locker.is_some()
  }

  /// The last snapshot read from storage.
  pub fn baseline(&self) -> &Snapshot {
    &self.baseline
  }

  /// An independent copy of the working snapshot.
  pub fn read(&self) -> Snapshot {
    self.current.clone()
  }

  /// Replace the working snapshot. Nothing is sent to storage.
  pub fn write(&mut self, snapshot: Snapshot) {
    self.current = snapshot;
  }

  /// Load state from storage, resetting both the working copy and the
  /// baseline. Absent state leaves both untouched.
  ///
  /// Returns true if a stored document was found.
  pub fn refresh(&mut self) -> Result<bool, StateError> {
    let Some(payload) = self.client.get()? else {
      debug!("no remote state found");
      return Ok(false);
    };

    let snapshot = self.codec.decode(&payload.data).map_err(StateError::CorruptState)?;

    debug!(
      serial = snapshot.serial,
      lineage = snapshot.lineage.as_deref().unwrap_or(""),
      digest = %payload.digest.short(12),
      "refreshed remote state"
    );

    self.current = snapshot.clone();
    self.baseline = snapshot;
    Ok(true)
  }

  /// Write the working snapshot to storage.
  ///
  /// The serial is reconciled against the baseline first. The working copy
  /// only takes the reconciled serial/lineage once the backend accepts it.
  pub fn persist(&mut self) -> Result<(), StateError> {
    let mut snapshot = self.current.clone();
    let outcome = snapshot.increment_serial_maybe(&self.baseline)?;

    let data = self.codec.encode(&snapshot).map_err(StateError::Encode)?;
    self.client.put(&data)?;

    info!(
      serial = snapshot.serial,
      lineage = snapshot.lineage.as_deref().unwrap_or(""),
      ?outcome,
      "persisted remote state"
    );

    self.current = snapshot;
    Ok(())
  }

  /// Lock the stored state if the backend supports it; a no-op otherwise.
  pub fn lock(&self, reason: &str) -> Result<(), StateError> {
    match &self.locker {
      Some(locker) => Ok(locker.lock(reason)?),
      None => {
        debug!("backend has no locking; lock is a no-op");
        Ok(())
      }
    }
  }

  /// Unlock the stored state if the backend supports it; a no-op otherwise.
  pub fn unlock(&self) -> Result<(), StateError> {
    match &self.locker {
      Some(locker) => Ok(locker.unlock()?),
      None => Ok(()),
    }
  }
}
