//! Backend configuration.
//!
//! A backend is described by a small JSON document tagged by `type`:
//!
//! ```json
//! { "type": "local", "path": "/var/lib/deploy/prod.tfstate" }
//! ```
//!
//! ```json
//! {
//!   "type": "http",
//!   "address": "https://state.example/app",
//!   "lock_address": "https://state.example/app/lock",
//!   "username": "ci",
//!   "password": "hunter2"
//! }
//! ```
//!
//! Without a config file the local backend at
//! [`state_path`](crate::platform::paths::state_path) is used.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::client::{ClientError, HttpClient, HttpClientConfig, LocalClient, StateClient, StateLocker};
use crate::platform::paths::state_path;
use crate::remote::RemoteState;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read backend config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse backend config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to set up backend: {0}")]
  Client(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
  Local { path: PathBuf },
  Http(HttpClientConfig),
}

impl Default for BackendConfig {
  fn default() -> Self {
    BackendConfig::Local { path: state_path() }
  }
}

impl BackendConfig {
  /// Load a backend config from a JSON file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let config: BackendConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    debug!(path = %path.display(), location = %config.location(), "loaded backend config");
    Ok(config)
  }

  /// Load `path` if given, else the default local backend.
  pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
    match path {
      Some(path) => Self::load(path),
      None => Ok(Self::default()),
    }
  }

  /// Human-readable location of the state document.
  pub fn location(&self) -> String {
    match self {
      BackendConfig::Local { path } => path.display().to_string(),
      BackendConfig::Http(http) => http.address.clone(),
    }
  }

  /// Build a [`RemoteState`] over the configured backend.
  ///
  /// Locking is wired up when the backend supports it.
  pub fn open(&self) -> Result<RemoteState, ConfigError> {
    let (client, locker): (Arc<dyn StateClient>, Option<Arc<dyn StateLocker>>) = match self {
      BackendConfig::Local { path } => {
        let client = Arc::new(LocalClient::new(path.clone()));
        let locker: Arc<dyn StateLocker> = client.clone();
        let client: Arc<dyn StateClient> = client;
        (client, Some(locker))
      }
      BackendConfig::Http(config) => {
        let client = Arc::new(HttpClient::new(config.clone())?);
        let locker = if client.supports_locking() {
          let locker: Arc<dyn StateLocker> = client.clone();
          Some(locker)
        } else {
          None
        };
        let client: Arc<dyn StateClient> = client;
        (client, locker)
      }
    };

    Ok(RemoteState::from_parts(client, locker))
  }
}
