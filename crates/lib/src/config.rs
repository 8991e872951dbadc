//! Service configuration passed into every component constructor.

use std::path::{Path, PathBuf};

use crate::consts::{
  BIOS_PERSIST_FILE, BOOT_ORDER_PERSIST_FILE, DEFAULT_PERSIST_PATH, PERSIST_PATH_ENV, SECURE_BOOT_PERSIST_FILE,
  SEED_FILE,
};
use crate::persist::SchemaVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
  /// Directory holding every persisted state file.
  pub persist_dir: PathBuf,
  /// Whether the secure boot object is hosted.
  pub secure_boot: bool,
  /// Layout used when writing the BIOS data file.
  pub table_format: SchemaVersion,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self::new(default_persist_dir())
  }
}

impl ServiceConfig {
  pub fn new(persist_dir: impl Into<PathBuf>) -> Self {
    Self {
      persist_dir: persist_dir.into(),
      secure_boot: true,
      table_format: SchemaVersion::Current,
    }
  }

  pub fn with_secure_boot(mut self, enabled: bool) -> Self {
    self.secure_boot = enabled;
    self
  }

  pub fn with_table_format(mut self, format: SchemaVersion) -> Self {
    self.table_format = format;
    self
  }

  pub fn persist_dir(&self) -> &Path {
    &self.persist_dir
  }

  pub fn bios_file(&self) -> PathBuf {
    self.persist_dir.join(BIOS_PERSIST_FILE)
  }

  pub fn boot_order_file(&self) -> PathBuf {
    self.persist_dir.join(BOOT_ORDER_PERSIST_FILE)
  }

  pub fn secure_boot_file(&self) -> PathBuf {
    self.persist_dir.join(SECURE_BOOT_PERSIST_FILE)
  }

  pub fn seed_file(&self) -> PathBuf {
    self.persist_dir.join(SEED_FILE)
  }
}

/// Returns the persist directory, honoring `BIOS_PERSIST_PATH`.
pub fn default_persist_dir() -> PathBuf {
  std::env::var_os(PERSIST_PATH_ENV)
    .filter(|value| !value.is_empty())
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from(DEFAULT_PERSIST_PATH))
}
