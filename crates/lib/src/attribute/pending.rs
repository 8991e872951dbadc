//! Pending change set reconciliation.
//!
//! A submitted batch is validated entry by entry against the base table. Only
//! if every entry passes is the batch upserted into the existing pending set,
//! so a rejected batch never leaves a partial mutation behind.

use tracing::{debug, error};

use super::types::{BaseTable, PendingAttributes};
use super::validate::check_pending_entry;
use crate::error::{BiosError, Result};

/// Validate every entry of `submitted` against `table`.
pub fn validate_batch(table: &BaseTable, submitted: &PendingAttributes) -> Result<()> {
  for (name, pending) in submitted {
    let Some(record) = table.get(name) else {
      error!(attribute = %name, "attribute not found in the base BIOS table");
      return Err(BiosError::AttributeNotFound(name.clone()));
    };
    check_pending_entry(name, record, pending)?;
  }
  Ok(())
}

/// Compute the pending set that results from submitting `submitted`.
///
/// An empty submission clears every pending change. Otherwise the batch is
/// validated as a whole and then upserted: entries named in the batch replace
/// their previous value, all other entries are kept.
pub fn merge_pending(
  table: &BaseTable,
  current: &PendingAttributes,
  submitted: PendingAttributes,
) -> Result<PendingAttributes> {
  if submitted.is_empty() {
    debug!(cleared = current.len(), "clearing pending attributes");
    return Ok(PendingAttributes::new());
  }

  validate_batch(table, &submitted)?;

  let mut merged = current.clone();
  for (name, pending) in submitted {
    debug!(attribute = %name, value = %pending.value, "staging pending attribute");
    merged.insert(name, pending);
  }
  Ok(merged)
}
