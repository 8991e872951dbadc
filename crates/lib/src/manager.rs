//! The BIOS configuration manager object.
//!
//! `Manager` exclusively owns the base BIOS table and the pending attribute
//! set. Every mutation goes through one of its entry points, updates memory
//! first, and then persists. A failed save is logged and swallowed.

use tracing::{debug, info};

use crate::attribute::{
  AttributeDetails, AttributeValue, BaseTable, PendingAttribute, PendingAttributes, ResetFlag, ValueTag, merge_pending,
};
use crate::config::ServiceConfig;
use crate::consts::{MANAGER_INTERFACE, MANAGER_OBJECT_PATH};
use crate::error::{BiosError, Result};
use crate::persist::{ManagerStore, PersistError, ensure_dir, load_or_discard, save_or_log};

#[derive(Debug)]
pub struct Manager {
  base_bios_table: BaseTable,
  pending_attributes: PendingAttributes,
  reset_bios_settings: ResetFlag,
  store: ManagerStore,
}

impl Manager {
  /// Open the manager, restoring the table and pending set from disk.
  ///
  /// A missing or unreadable data file yields an empty manager. Only failing
  /// to create the persist directory is an error.
  pub fn open(config: &ServiceConfig) -> Result<Self, PersistError> {
    ensure_dir(config.persist_dir())?;
    let store = ManagerStore::new(config.bios_file(), config.table_format);
    let data = load_or_discard("bios", store.path(), |_| store.load()).unwrap_or_default();

    info!(
      object = MANAGER_OBJECT_PATH,
      interface = MANAGER_INTERFACE,
      attributes = data.base_bios_table.len(),
      pending = data.pending_attributes.len(),
      "BIOS config manager ready"
    );

    Ok(Self {
      base_bios_table: data.base_bios_table,
      pending_attributes: data.pending_attributes,
      reset_bios_settings: ResetFlag::NoAction,
      store,
    })
  }

  pub fn base_bios_table(&self) -> &BaseTable {
    &self.base_bios_table
  }

  /// Replace the base BIOS table wholesale.
  ///
  /// The table comes from the firmware and is trusted as is. Pending changes
  /// are dropped because they may refer to attributes that no longer exist or
  /// changed type, and any outstanding reset request is cleared.
  pub fn set_base_bios_table(&mut self, table: BaseTable) -> &BaseTable {
    info!(
      attributes = table.len(),
      dropped_pending = self.pending_attributes.len(),
      "replacing base BIOS table"
    );
    self.pending_attributes.clear();
    self.base_bios_table = table;
    self.persist();
    self.reset_bios_settings = ResetFlag::NoAction;
    &self.base_bios_table
  }

  pub fn pending_attributes(&self) -> &PendingAttributes {
    &self.pending_attributes
  }

  /// Submit a batch of pending changes.
  ///
  /// An empty batch clears all pending changes. A non-empty batch is
  /// validated as a whole and upserted; if any entry is rejected the pending
  /// set is left exactly as it was.
  pub fn set_pending_attributes(&mut self, submitted: PendingAttributes) -> Result<&PendingAttributes> {
    let merged = merge_pending(&self.base_bios_table, &self.pending_attributes, submitted)?;
    self.pending_attributes = merged;
    self.persist();
    Ok(&self.pending_attributes)
  }

  /// Stage a single new value.
  ///
  /// The claimed type is the one declared in the base table, so the value
  /// only has to carry the right tag and satisfy the bound rules.
  pub fn set_attribute(&mut self, name: &str, value: AttributeValue) -> Result<()> {
    let record = self
      .base_bios_table
      .get(name)
      .ok_or_else(|| BiosError::AttributeNotFound(name.to_string()))?;

    debug!(attribute = %name, value = %value, "set attribute");
    let submitted = PendingAttributes::from([(name.to_string(), PendingAttribute::new(record.attribute_type, value))]);
    self.set_pending_attributes(submitted)?;
    Ok(())
  }

  /// Look up an attribute's type, current value, and pending value.
  pub fn get_attribute(&self, name: &str) -> Result<AttributeDetails> {
    let record = self
      .base_bios_table
      .get(name)
      .ok_or_else(|| BiosError::AttributeNotFound(name.to_string()))?;

    let pending_value = match self.pending_attributes.get(name) {
      Some(pending) => Some(pending.value.clone()),
      None => match record.current_value.tag() {
        ValueTag::String => Some(AttributeValue::String(String::new())),
        ValueTag::Integer => None,
      },
    };

    Ok(AttributeDetails {
      attribute_type: record.attribute_type,
      current_value: record.current_value.clone(),
      pending_value,
    })
  }

  pub fn reset_bios_settings(&self) -> ResetFlag {
    self.reset_bios_settings
  }

  pub fn set_reset_bios_settings(&mut self, flag: ResetFlag) -> ResetFlag {
    info!(flag = %flag, "reset BIOS settings requested");
    self.reset_bios_settings = flag;
    flag
  }

  fn persist(&self) {
    save_or_log("bios", self.store.save(&self.base_bios_table, &self.pending_attributes));
  }
}
