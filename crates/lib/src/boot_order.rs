//! Boot order object: the current and pending boot device lists.
//!
//! # File Format
//!
//! ```json
//! { "version": 1, "bootOrder": ["Boot0001", "DISK"], "pendingBootOrder": [] }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::ServiceConfig;
use crate::consts::{BOOT_ORDER_INTERFACE, BOOT_ORDER_OBJECT_PATH};
use crate::error::{BiosError, Result};
use crate::persist::{PersistError, ensure_dir, load_or_discard, parse, read_optional, save_or_log, write_json};

/// Boot device names accepted without a slot number.
pub const VALID_BOOT_ORDER_VALUES: &[&str] = &[
  "DISK",
  "RESERVED",
  "NETWORK",
  "USB",
  "HTTP",
  "IPv4",
  "IPv6",
  "DEFAULT",
  "ExternalMedia",
  "RemovableMedia",
];

const STATE_VERSION: u32 = 1;

/// Whether `token` names a known boot device or a `BootNNNN` slot.
pub fn is_valid_boot_order_value(token: &str) -> bool {
  VALID_BOOT_ORDER_VALUES.contains(&token) || is_boot_slot(token)
}

fn is_boot_slot(token: &str) -> bool {
  token
    .strip_prefix("Boot")
    .is_some_and(|digits| digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Whether every token in `order` is valid. An empty list is valid.
pub fn is_valid_boot_order_sequence<S: AsRef<str>>(order: &[S]) -> bool {
  order.iter().all(|token| is_valid_boot_order_value(token.as_ref()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootOrderState {
  pub boot_order: Vec<String>,
  pub pending_boot_order: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateDocumentRef<'a> {
  version: u32,
  #[serde(flatten)]
  state: &'a BootOrderState,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateDocument {
  version: u32,
  #[serde(flatten)]
  state: BootOrderState,
}

fn load_state(path: &Path) -> Result<Option<BootOrderState>, PersistError> {
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
pub struct BootOrder {
  state: BootOrderState,
  path: PathBuf,
}

impl BootOrder {
  pub fn open(config: &ServiceConfig) -> Result<Self, PersistError> {
    ensure_dir(config.persist_dir())?;
    let path = config.boot_order_file();
    let state = load_or_discard("boot order", &path, load_state).unwrap_or_default();
    info!(
      object = BOOT_ORDER_OBJECT_PATH,
      interface = BOOT_ORDER_INTERFACE,
      entries = state.boot_order.len(),
      "boot order ready"
    );
    Ok(Self { state, path })
  }

  pub fn state(&self) -> &BootOrderState {
    &self.state
  }

  pub fn boot_order(&self) -> &[String] {
    &self.state.boot_order
  }

  pub fn pending_boot_order(&self) -> &[String] {
    &self.state.pending_boot_order
  }

  /// Replace the current boot order.
  pub fn set_boot_order(&mut self, order: Vec<String>) -> Result<&[String]> {
    check_sequence("boot order", &order)?;
    info!(order = ?order, "boot order set");
    self.state.boot_order = order;
    self.persist();
    Ok(&self.state.boot_order)
  }

  /// Replace the pending boot order.
  pub fn set_pending_boot_order(&mut self, order: Vec<String>) -> Result<&[String]> {
    check_sequence("pending boot order", &order)?;
    info!(order = ?order, "pending boot order set");
    self.state.pending_boot_order = order;
    self.persist();
    Ok(&self.state.pending_boot_order)
  }

  fn persist(&self) {
    let doc = StateDocumentRef {
      version: STATE_VERSION,
      state: &self.state,
    };
    save_or_log("boot order", write_json(&self.path, &doc));
  }
}

fn check_sequence(what: &str, order: &[String]) -> Result<()> {
  if let Some(bad) = order.iter().find(|token| !is_valid_boot_order_value(token)) {
    error!(list = what, token = %bad, "invalid boot order token");
    return Err(BiosError::invalid_argument(format!("invalid {what} token '{bad}'")));
  }
  Ok(())
}
