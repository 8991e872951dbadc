mod attribute;
mod boot_order;
mod password;
mod pending;
mod reset;
mod secure_boot;
mod serve;
mod table;

pub use attribute::{cmd_get, cmd_set};
pub use boot_order::{cmd_boot_order_set, cmd_boot_order_show};
pub use password::cmd_password_change;
pub use pending::{cmd_pending_clear, cmd_pending_load, cmd_pending_show};
pub use reset::{cmd_reset_set, cmd_reset_show};
pub use secure_boot::{
  cmd_secure_boot_set_current, cmd_secure_boot_set_mode, cmd_secure_boot_set_pending_enable, cmd_secure_boot_show,
};
pub use serve::cmd_serve;
pub use table::{cmd_table_load, cmd_table_show};

use std::path::Path;

use anyhow::{Context, anyhow};
use biosconf_lib::Response;
use serde::de::DeserializeOwned;

/// Error for a response variant the command did not ask for.
fn unexpected(response: Response) -> anyhow::Error {
  anyhow!("Unexpected response from service: {:?}", response)
}

/// Read and parse a JSON input file.
fn read_json_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
  let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
