mod lock;
mod pull;
mod push;
mod show;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use remstate_lib::config::BackendConfig;
use remstate_lib::platform::paths::backend_config_path;

pub use lock::{cmd_lock, cmd_unlock};
pub use pull::cmd_pull;
pub use push::cmd_push;
pub use show::cmd_show;

/// Resolve the backend config: the explicit file, the user config file if it
/// exists, or the default local backend.
pub fn load_backend_config(explicit: Option<&Path>) -> Result<BackendConfig> {
  if let Some(path) = explicit {
    return BackendConfig::load(path).context("Failed to load backend config");
  }

  let user_config = backend_config_path();
  if user_config.is_file() {
    debug!(path = %user_config.display(), "using user backend config");
    return BackendConfig::load(&user_config).context("Failed to load backend config");
  }

  Ok(BackendConfig::default())
}
