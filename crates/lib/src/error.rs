//! Errors surfaced to callers of the BIOS configuration objects.
//!
//! Every failure a remote caller can observe is one of the variants of
//! [`BiosError`]. Each variant maps onto a fully qualified bus error name so
//! the binding layer can forward it without inspecting the message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BIOS_ERROR_NAMESPACE, COMMON_ERROR_NAMESPACE};

/// Result alias for BIOS configuration operations.
pub type Result<T, E = BiosError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BiosError {
  /// The attribute is not part of the base BIOS table.
  #[error("attribute not found: {0}")]
  AttributeNotFound(String),

  /// The attribute is marked read-only in the base BIOS table.
  #[error("attribute is read-only: {0}")]
  AttributeReadOnly(String),

  /// Wrong type, wrong value tag, or a value outside the attribute's bounds.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// The supplied current password does not match the stored hash.
  #[error("invalid current password")]
  InvalidCurrentPassword,

  /// I/O or crypto primitive failure, or an object that is not hosted.
  #[error("internal failure: {0}")]
  InternalFailure(String),
}

impl BiosError {
  pub fn invalid_argument(message: impl Into<String>) -> Self {
    Self::InvalidArgument(message.into())
  }

  pub fn internal(message: impl Into<String>) -> Self {
    Self::InternalFailure(message.into())
  }

  /// Fully qualified error name as seen on the bus.
  pub fn bus_name(&self) -> String {
    match self {
      Self::AttributeNotFound(_) => format!("{BIOS_ERROR_NAMESPACE}.AttributeNotFound"),
      Self::AttributeReadOnly(_) => format!("{BIOS_ERROR_NAMESPACE}.AttributeReadOnly"),
      Self::InvalidCurrentPassword => format!("{BIOS_ERROR_NAMESPACE}.InvalidCurrentPassword"),
      Self::InvalidArgument(_) => format!("{COMMON_ERROR_NAMESPACE}.InvalidArgument"),
      Self::InternalFailure(_) => format!("{COMMON_ERROR_NAMESPACE}.InternalFailure"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bus_names_use_their_namespace() {
    assert_eq!(
      BiosError::AttributeNotFound("Foo".into()).bus_name(),
      "xyz.openbmc_project.BIOSConfig.Common.Error.AttributeNotFound"
    );
    assert_eq!(
      BiosError::invalid_argument("bad").bus_name(),
      "xyz.openbmc_project.Common.Error.InvalidArgument"
    );
    assert_eq!(
      BiosError::internal("disk").bus_name(),
      "xyz.openbmc_project.Common.Error.InternalFailure"
    );
  }

  #[test]
  fn display_includes_attribute_name() {
    let err = BiosError::AttributeReadOnly("BootMode".into());
    assert_eq!(err.to_string(), "attribute is read-only: BootMode");
  }
}
