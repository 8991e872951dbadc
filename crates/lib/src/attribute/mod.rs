//! BIOS attribute schema, validation, and pending-change reconciliation.

pub mod pending;
pub mod types;
pub mod validate;

pub use pending::merge_pending;
pub use types::{
  AttributeDetails, AttributeRecord, AttributeType, AttributeValue, BaseTable, BoundOption, BoundType,
  PendingAttribute, PendingAttributes, ResetFlag, ValueTag,
};
pub use validate::{validate_enum, validate_integer, validate_string};
