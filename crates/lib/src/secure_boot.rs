//! Secure boot object.
//!
//! Holds the secure boot state reported and requested by the host firmware.
//! Every property write is persisted immediately.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bus_enum::bus_enum;
use crate::config::ServiceConfig;
use crate::consts::{SECURE_BOOT_INTERFACE, SECURE_BOOT_OBJECT_PATH};
use crate::persist::{PersistError, ensure_dir, load_or_discard, parse, read_optional, save_or_log, write_json};

const STATE_VERSION: u32 = 1;

bus_enum! {
  /// Secure boot state of the current boot.
  #[derive(Default)]
  pub enum CurrentBootType in "xyz.openbmc_project.BIOSConfig.SecureBoot.CurrentBootType" {
    #[default]
    Unknown,
    Disabled,
    Enabled,
  }
}

bus_enum! {
  /// Secure boot key provisioning mode.
  #[derive(Default)]
  pub enum ModeType in "xyz.openbmc_project.BIOSConfig.SecureBoot.ModeType" {
    #[default]
    Unknown,
    Setup,
    User,
    Audit,
    Deployed,
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureBootState {
  pub current_boot: CurrentBootType,
  pub pending_enable: bool,
  pub mode: ModeType,
}

#[derive(Serialize, Deserialize)]
struct StateDocument {
  version: u32,
  #[serde(flatten)]
  state: SecureBootState,
}

fn load_state(path: &Path) -> Result<Option<SecureBootState>, PersistError> {
  let Some(content) = read_optional(path)? else {
    return Ok(None);
  };
  let doc: StateDocument = parse(path, &content)?;
  if doc.version != STATE_VERSION {
    return Err(PersistError::UnsupportedVersion {
      path: path.to_path_buf(),
      found: doc.version,
    });
  }
  Ok(Some(doc.state))
}

#[derive(Debug)]
pub struct SecureBoot {
  state: SecureBootState,
  path: PathBuf,
}

impl SecureBoot {
  pub fn open(config: &ServiceConfig) -> Result<Self, PersistError> {
    ensure_dir(config.persist_dir())?;
    let path = config.secure_boot_file();
    let state = load_or_discard("secure boot", &path, load_state).unwrap_or_default();
    info!(
      object = SECURE_BOOT_OBJECT_PATH,
      interface = SECURE_BOOT_INTERFACE,
      current_boot = %state.current_boot,
      mode = %state.mode,
      "secure boot ready"
    );
    Ok(Self { state, path })
  }

  pub fn state(&self) -> SecureBootState {
    self.state
  }

  pub fn current_boot(&self) -> CurrentBootType {
    self.state.current_boot
  }

  pub fn set_current_boot(&mut self, value: CurrentBootType) -> CurrentBootType {
    info!(value = %value, "secure boot current boot set");
    self.state.current_boot = value;
    self.persist();
    value
  }

  pub fn pending_enable(&self) -> bool {
    self.state.pending_enable
  }

  pub fn set_pending_enable(&mut self, value: bool) -> bool {
    info!(value, "secure boot pending enable set");
    self.state.pending_enable = value;
    self.persist();
    value
  }

  pub fn mode(&self) -> ModeType {
    self.state.mode
  }

  pub fn set_mode(&mut self, value: ModeType) -> ModeType {
    info!(value = %value, "secure boot mode set");
    self.state.mode = value;
    self.persist();
    value
  }

  fn persist(&self) {
    let doc = StateDocument {
      version: STATE_VERSION,
      state: self.state,
    };
    save_or_log("secure boot", write_json(&self.path, &doc));
  }
}
