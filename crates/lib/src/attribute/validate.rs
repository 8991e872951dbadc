//! Bound-rule validation for candidate attribute values.
//!
//! The functions here are pure: they look at a candidate value and the bound
//! rules of one attribute and answer yes or no. Turning a `false` into an
//! error is the caller's job.
//!
//! Missing bounds default to 0, so:
//! - a string attribute without `MaxStringLength` accepts only `""`;
//! - an integer attribute whose `ScalarIncrement` is 0 (or missing) accepts
//!   nothing.

use super::types::{AttributeRecord, AttributeType, AttributeValue, BoundOption, BoundType, PendingAttribute};
use crate::error::{BiosError, Result};

/// True iff some `OneOf` rule carries exactly `value`.
pub fn validate_enum(value: &str, options: &[BoundOption]) -> bool {
  options
    .iter()
    .any(|option| option.kind == BoundType::OneOf && option.value.as_str() == Some(value))
}

/// True iff `min_len <= value.len() <= max_len`, lengths counted in bytes.
pub fn validate_string(value: &str, options: &[BoundOption]) -> bool {
  let (Some(min_len), Some(max_len)) = (
    integer_bound(options, BoundType::MinStringLength),
    integer_bound(options, BoundType::MaxStringLength),
  ) else {
    return false;
  };

  let len = value.len() as i128;
  i128::from(min_len) <= len && len <= i128::from(max_len)
}

/// True iff `lower <= value <= upper` and `value` is a whole number of
/// increments above `lower`.
pub fn validate_integer(value: i64, options: &[BoundOption]) -> bool {
  let (Some(lower), Some(upper), Some(increment)) = (
    integer_bound(options, BoundType::LowerBound),
    integer_bound(options, BoundType::UpperBound),
    integer_bound(options, BoundType::ScalarIncrement),
  ) else {
    return false;
  };

  if value < lower || value > upper {
    return false;
  }

  if increment == 0 {
    return false;
  }

  let distance = (i128::from(value) - i128::from(lower)).abs();
  distance % i128::from(increment).abs() == 0
}

/// Value of the last rule of `kind`, or 0 when there is none.
///
/// Returns `None` if such a rule carries a string, which cannot be used as a
/// numeric bound.
fn integer_bound(options: &[BoundOption], kind: BoundType) -> Option<i64> {
  match options.iter().rev().find(|option| option.kind == kind) {
    None => Some(0),
    Some(option) => option.value.as_integer(),
  }
}

/// Check one submitted pending entry against its table record.
///
/// Enforces, in order: the record is writable, the claimed type matches, the
/// value tag matches the type, and the value satisfies the bound rules.
pub fn check_pending_entry(name: &str, record: &AttributeRecord, pending: &PendingAttribute) -> Result<()> {
  if record.read_only {
    tracing::error!(attribute = %name, "attribute is read-only");
    return Err(BiosError::AttributeReadOnly(name.to_string()));
  }

  if pending.attribute_type != record.attribute_type {
    tracing::error!(
      attribute = %name,
      claimed = %pending.attribute_type,
      declared = %record.attribute_type,
      "attribute type does not match the base BIOS table"
    );
    return Err(BiosError::invalid_argument(format!(
      "{name}: type {} does not match declared type {}",
      pending.attribute_type, record.attribute_type
    )));
  }

  let accepted = match (record.attribute_type, &pending.value) {
    (AttributeType::Enumeration, AttributeValue::String(value)) => validate_enum(value, &record.options),
    (AttributeType::String, AttributeValue::String(value)) => validate_string(value, &record.options),
    (AttributeType::Integer, AttributeValue::Integer(value)) => validate_integer(*value, &record.options),
    (attribute_type, value) => {
      tracing::error!(
        attribute = %name,
        expected = %attribute_type.value_tag(),
        actual = %value.tag(),
        "attribute value has the wrong tag"
      );
      return Err(BiosError::invalid_argument(format!(
        "{name}: expected {} value, got {}",
        attribute_type.value_tag(),
        value.tag()
      )));
    }
  };

  if !accepted {
    tracing::error!(attribute = %name, value = %pending.value, "value violates the attribute's bounds");
    return Err(BiosError::invalid_argument(format!(
      "{name}: {} is not a valid value",
      pending.value
    )));
  }

  Ok(())
}
