//! Filesystem-backed state storage.
//!
//! # Storage Layout
//!
//! ```text
//! {dir}/
//! ├── default.tfstate        # The state document
//! └── default.tfstate.lock   # LockInfo JSON, present while locked
//! ```
//!
//! Writes go to a temp file in the same directory and are renamed into place,
//! so readers never observe a half-written document.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{ClientError, LockError, LockInfo, Payload, StateClient, StateLocker};
use crate::consts::LOCK_SUFFIX;

/// Stores state in a single local file.
#[derive(Debug, Clone)]
pub struct LocalClient {
  path: PathBuf,
  lock_path: PathBuf,
}

impl LocalClient {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let mut lock_path = OsString::from(path.as_os_str());
    lock_path.push(LOCK_SUFFIX);
    Self {
      path,
      lock_path: PathBuf::from(lock_path),
    }
  }

  /// Path of the state document.
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Path of the lock file.
  pub fn lock_path(&self) -> &Path {
    &self.lock_path
  }

  /// Read the metadata of the current lock holder, if the state is locked.
  pub fn read_lock_info(&self) -> Result<Option<LockInfo>, LockError> {
    let content = match fs::read_to_string(&self.lock_path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(LockError::Io(e)),
    };

    match serde_json::from_str(&content) {
      Ok(info) => Ok(Some(info)),
      Err(_) => Err(LockError::HeldUnknown {
        location: self.lock_path.display().to_string(),
      }),
    }
  }

  fn parent_dir(&self) -> &Path {
    match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    }
  }

  fn contention_error(&self) -> LockError {
    match self.read_lock_info() {
      Ok(Some(info)) => LockError::Held(Box::new(info)),
      _ => LockError::HeldUnknown {
        location: self.lock_path.display().to_string(),
      },
    }
  }

  fn write_lock_info(file: &File, info: &LockInfo) -> io::Result<()> {
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, info).map_err(io::Error::other)?;
    writer.flush()
  }
}

impl StateClient for LocalClient {
  fn get(&self) -> Result<Option<Payload>, ClientError> {
    let data = match fs::read(&self.path) {
      Ok(data) => data,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "no local state file");
        return Ok(None);
      }
      Err(e) => return Err(ClientError::Read(e)),
    };

    if data.is_empty() {
      debug!(path = %self.path.display(), "local state file is empty");
      return Ok(None);
    }

    Ok(Some(Payload::new(data)))
  }

  fn put(&self, data: &[u8]) -> Result<(), ClientError> {
    let dir = self.parent_dir();
    fs::create_dir_all(dir).map_err(ClientError::CreateDir)?;

    let mut temp = NamedTempFile::new_in(dir).map_err(ClientError::Write)?;
    temp.write_all(data).map_err(ClientError::Write)?;
    temp.as_file().sync_all().map_err(ClientError::Write)?;
    temp.persist(&self.path).map_err(|e| ClientError::Write(e.error))?;

    debug!(path = %self.path.display(), bytes = data.len(), "wrote local state");
    Ok(())
  }
}

impl StateLocker for LocalClient {
  fn lock(&self, reason: &str) -> Result<(), LockError> {
    fs::create_dir_all(self.parent_dir()).map_err(LockError::Io)?;

    let file = match OpenOptions::new().write(true).create_new(true).open(&self.lock_path) {
      Ok(file) => file,
      Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(self.contention_error()),
      Err(e) => return Err(LockError::Io(e)),
    };

    let info = LockInfo::new(reason, self.path.display().to_string());
    if let Err(e) = Self::write_lock_info(&file, &info) {
      drop(file);
      let _ = fs::remove_file(&self.lock_path);
      return Err(LockError::Io(e));
    }

    info!(lock = %self.lock_path.display(), id = %info.id, "acquired state lock");
    Ok(())
  }

  fn unlock(&self) -> Result<(), LockError> {
    match fs::remove_file(&self.lock_path) {
      Ok(()) => {
        info!(lock = %self.lock_path.display(), "released state lock");
        Ok(())
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LockError::NotHeld {
        location: self.lock_path.display().to_string(),
      }),
      Err(e) => Err(LockError::Io(e)),
    }
  }
}
