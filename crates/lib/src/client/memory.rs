//! In-process state storage.
//!
//! Keeps the document in memory and records how often each operation was
//! called, which makes it the backend of choice for exercising
//! [`RemoteState`](crate::remote::RemoteState) without touching disk or
//! network. Failures can be injected for the next call.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{ClientError, LockError, LockInfo, Payload, StateClient, StateLocker};

const LOCATION: &str = "memory";

#[derive(Debug, Default)]
struct Inner {
  data: Option<Vec<u8>>,
  lock: Option<LockInfo>,
  fail_next: Option<String>,
}

/// Call counters of a [`MemoryClient`].
#[derive(Debug, Default)]
struct Calls {
  get: AtomicUsize,
  put: AtomicUsize,
  lock: AtomicUsize,
  unlock: AtomicUsize,
}

#[derive(Debug, Default)]
pub struct MemoryClient {
  inner: Mutex<Inner>,
  calls: Calls,
}

impl MemoryClient {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a client that already holds `data`.
  pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
    let client = Self::default();
    client.inner().data = Some(data.into());
    client
  }

  /// The currently stored bytes.
  pub fn data(&self) -> Option<Vec<u8>> {
    self.inner().data.clone()
  }

  /// Replace the stored bytes without counting a `put`.
  pub fn set_data(&self, data: Option<Vec<u8>>) {
    self.inner().data = data;
  }

  /// Make the next operation of any kind fail with `message`.
  pub fn fail_next(&self, message: impl Into<String>) {
    self.inner().fail_next = Some(message.into());
  }

  pub fn is_locked(&self) -> bool {
    self.inner().lock.is_some()
  }

  pub fn get_calls(&self) -> usize {
    self.calls.get.load(Ordering::SeqCst)
  }

  pub fn put_calls(&self) -> usize {
    self.calls.put.load(Ordering::SeqCst)
  }

  pub fn lock_calls(&self) -> usize {
    self.calls.lock.load(Ordering::SeqCst)
  }

  pub fn unlock_calls(&self) -> usize {
    self.calls.unlock.load(Ordering::SeqCst)
  }

  fn inner(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl StateClient for MemoryClient {
  fn get(&self) -> Result<Option<Payload>, ClientError> {
    self.calls.get.fetch_add(1, Ordering::SeqCst);
    let mut inner = self.inner();
    if let Some(message) = inner.fail_next.take() {
      return Err(ClientError::Unavailable(message));
    }
    Ok(inner.data.clone().map(Payload::new))
  }

  fn put(&self, data: &[u8]) -> Result<(), ClientError> {
    self.calls.put.fetch_add(1, Ordering::SeqCst);
    let mut inner = self.inner();
    if let Some(message) = inner.fail_next.take() {
      return Err(ClientError::Unavailable(message));
    }
    inner.data = Some(data.to_vec());
    Ok(())
  }
}

impl StateLocker for MemoryClient {
  fn lock(&self, reason: &str) -> Result<(), LockError> {
    self.calls.lock.fetch_add(1, Ordering::SeqCst);
    let mut inner = self.inner();
    if let Some(message) = inner.fail_next.take() {
      return Err(LockError::Unavailable(message));
    }
    if let Some(holder) = &inner.lock {
      return Err(LockError::Held(Box::new(holder.clone())));
    }
    inner.lock = Some(LockInfo::new(reason, LOCATION));
    Ok(())
  }

  fn unlock(&self) -> Result<(), LockError> {
    self.calls.unlock.fetch_add(1, Ordering::SeqCst);
    let mut inner = self.inner();
    if let Some(message) = inner.fail_next.take() {
      return Err(LockError::Unavailable(message));
    }
    match inner.lock.take() {
      Some(_) => Ok(()),
      None => Err(LockError::NotHeld {
        location: LOCATION.to_string(),
      }),
    }
  }
}
