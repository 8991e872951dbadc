//! Durable storage for BIOS configuration state.
//!
//! Every component keeps its state in one JSON document under the persist
//! directory. Documents carry a `version` tag.
//!
//! # Storage Layout
//!
//! ```text
//! {persist_dir}/
//! ├── biosData          # base BIOS table + pending attributes
//! ├── bootOrderData     # current + pending boot order
//! ├── securebootData    # secure boot state
//! └── seedData          # password hashes and seed (provisioned externally)
//! ```
//!
//! Persistence is best effort. A failed save is logged and the in-memory state
//! stays authoritative. A file that cannot be loaded is logged, removed, and
//! the component starts from its defaults.

pub mod manager;
pub mod migrate;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, warn};

pub use manager::{ManagerData, ManagerStore, SchemaVersion};
pub use migrate::MigrationError;

/// Errors that can occur while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum PersistError {
  /// Failed to read a state file.
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to write a state file.
  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to create the persist directory.
  #[error("failed to create directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to parse a state file.
  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// Failed to serialize state.
  #[error("failed to serialize state: {0}")]
  Serialize(#[source] serde_json::Error),

  /// The file carries a version tag this build does not know.
  #[error("unsupported version {found} in {path}")]
  UnsupportedVersion { path: PathBuf, found: u32 },

  /// Converting between table shapes failed.
  #[error(transparent)]
  Migration(#[from] MigrationError),
}

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
  fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
    path: dir.to_path_buf(),
    source,
  })
}

/// Read a file to a string. Returns `Ok(None)` if it does not exist.
pub fn read_optional(path: &Path) -> Result<Option<String>, PersistError> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(Some(content)),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(source) => Err(PersistError::Read {
      path: path.to_path_buf(),
      source,
    }),
  }
}

/// Parse `content` read from `path`.
pub fn parse<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, PersistError> {
  serde_json::from_str(content).map_err(|source| PersistError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

/// Write `value` as pretty JSON.
///
/// Uses atomic write (write to temp, then rename) so a crash never leaves a
/// torn file behind.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistError> {
  if let Some(parent) = path.parent() {
    ensure_dir(parent)?;
  }

  let content = serde_json::to_string_pretty(value).map_err(PersistError::Serialize)?;

  let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  temp_name.push(".tmp");
  let temp_path = path.with_file_name(temp_name);

  let write_err = |source| PersistError::Write {
    path: path.to_path_buf(),
    source,
  };
  fs::write(&temp_path, &content).map_err(write_err)?;
  if let Err(source) = fs::rename(&temp_path, path) {
    let _ = fs::remove_file(&temp_path);
    return Err(write_err(source));
  }

  debug!(path = %path.display(), bytes = content.len(), "state saved");
  Ok(())
}

/// Run `load`; on failure log it, remove the offending file, and return `None`.
pub fn load_or_discard<T>(
  what: &str,
  path: &Path,
  load: impl FnOnce(&Path) -> Result<Option<T>, PersistError>,
) -> Option<T> {
  match load(path) {
    Ok(value) => value,
    Err(e) => {
      error!(state = what, path = %path.display(), error = %e, "failed to load state, discarding");
      match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove unreadable state file"),
      }
      None
    }
  }
}

/// Log and swallow a failed save.
pub fn save_or_log(what: &str, result: Result<(), PersistError>) {
  if let Err(e) = result {
    error!(state = what, error = %e, "failed to persist state");
  }
}
