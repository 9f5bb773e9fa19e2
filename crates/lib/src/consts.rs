/// Application name used for platform directories.
pub const APP_NAME: &str = "remstate";

/// Snapshot document format version written by [`crate::codec::JsonCodec`].
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Environment variable overriding the default local state file.
pub const STATE_PATH_ENV: &str = "REMSTATE_STATE";

/// Directory name for state files within the data directory.
pub const STATE_DIR: &str = "state";

/// File name of the default local state document.
pub const DEFAULT_STATE_FILENAME: &str = "default.tfstate";

/// Suffix appended to a local state path to form its lock file.
pub const LOCK_SUFFIX: &str = ".lock";

/// Version of the lock metadata document.
pub const LOCK_INFO_VERSION: u32 = 1;
