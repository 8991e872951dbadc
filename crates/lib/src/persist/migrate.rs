//! Conversion between the legacy and current base table shapes.
//!
//! The legacy shape stores bound rules as `[kind, value]` pairs. The current
//! shape adds a display label: `[kind, value, label]`. Every other field is
//! identical and is carried over verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attribute::{AttributeRecord, AttributeType, AttributeValue, BaseTable, BoundOption, BoundType, ValueTag};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
  /// A stored value carries a different tag than its declared type needs.
  #[error("attribute {attribute}: {field} is a {actual} value but {attribute_type} requires {expected}")]
  ValueTagMismatch {
    attribute: String,
    field: &'static str,
    attribute_type: AttributeType,
    expected: ValueTag,
    actual: ValueTag,
  },
}

/// Legacy bound rule, persisted as a `[kind, value]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(BoundType, AttributeValue)", into = "(BoundType, AttributeValue)")]
pub struct LegacyBoundOption {
  pub kind: BoundType,
  pub value: AttributeValue,
}

impl From<(BoundType, AttributeValue)> for LegacyBoundOption {
  fn from((kind, value): (BoundType, AttributeValue)) -> Self {
    Self { kind, value }
  }
}

impl From<LegacyBoundOption> for (BoundType, AttributeValue) {
  fn from(option: LegacyBoundOption) -> Self {
    (option.kind, option.value)
  }
}

/// Table row in the legacy shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAttributeRecord {
  pub attribute_type: AttributeType,
  pub read_only: bool,
  pub display_name: String,
  pub description: String,
  pub menu_path: String,
  pub current_value: AttributeValue,
  pub default_value: AttributeValue,
  pub options: Vec<LegacyBoundOption>,
}

pub type LegacyBaseTable = BTreeMap<String, LegacyAttributeRecord>;

fn check_tag(
  attribute: &str,
  attribute_type: AttributeType,
  field: &'static str,
  value: &AttributeValue,
) -> Result<(), MigrationError> {
  let expected = attribute_type.value_tag();
  if value.tag() != expected {
    return Err(MigrationError::ValueTagMismatch {
      attribute: attribute.to_string(),
      field,
      attribute_type,
      expected,
      actual: value.tag(),
    });
  }
  Ok(())
}

fn check_values(
  attribute: &str,
  attribute_type: AttributeType,
  current: &AttributeValue,
  default: &AttributeValue,
) -> Result<(), MigrationError> {
  check_tag(attribute, attribute_type, "currentValue", current)?;
  check_tag(attribute, attribute_type, "defaultValue", default)
}

/// Upgrade a legacy table: every bound rule gets an empty display label.
pub fn legacy_to_current(table: LegacyBaseTable) -> Result<BaseTable, MigrationError> {
  table
    .into_iter()
    .map(|(name, record)| {
      check_values(&name, record.attribute_type, &record.current_value, &record.default_value)?;
      let options = record
        .options
        .into_iter()
        .map(|option| BoundOption {
          kind: option.kind,
          value: option.value,
          display_label: String::new(),
        })
        .collect();
      let converted = AttributeRecord {
        attribute_type: record.attribute_type,
        read_only: record.read_only,
        display_name: record.display_name,
        description: record.description,
        menu_path: record.menu_path,
        current_value: record.current_value,
        default_value: record.default_value,
        options,
      };
      Ok((name, converted))
    })
    .collect()
}

/// Downgrade a table to the legacy shape, dropping display labels.
pub fn current_to_legacy(table: &BaseTable) -> Result<LegacyBaseTable, MigrationError> {
  table
    .iter()
    .map(|(name, record)| {
      check_values(name, record.attribute_type, &record.current_value, &record.default_value)?;
      let options = record
        .options
        .iter()
        .map(|option| LegacyBoundOption {
          kind: option.kind,
          value: option.value.clone(),
        })
        .collect();
      let converted = LegacyAttributeRecord {
        attribute_type: record.attribute_type,
        read_only: record.read_only,
        display_name: record.display_name.clone(),
        description: record.description.clone(),
        menu_path: record.menu_path.clone(),
        current_value: record.current_value.clone(),
        default_value: record.default_value.clone(),
        options,
      };
      Ok((name.clone(), converted))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn legacy_table() -> LegacyBaseTable {
    let frequency = LegacyAttributeRecord {
      attribute_type: AttributeType::Integer,
      read_only: false,
      display_name: "CPU Frequency".into(),
      description: "Core frequency in MHz".into(),
      menu_path: "./Processor".into(),
      current_value: AttributeValue::Integer(1800),
      default_value: AttributeValue::Integer(1600),
      options: vec![
        (BoundType::LowerBound, AttributeValue::Integer(800)).into(),
        (BoundType::UpperBound, AttributeValue::Integer(3200)).into(),
        (BoundType::ScalarIncrement, AttributeValue::Integer(100)).into(),
      ],
    };
    let turbo = LegacyAttributeRecord {
      attribute_type: AttributeType::Enumeration,
      read_only: true,
      display_name: "Turbo".into(),
      description: String::new(),
      menu_path: "./Processor".into(),
      current_value: "Enabled".into(),
      default_value: "Disabled".into(),
      options: vec![
        (BoundType::OneOf, AttributeValue::from("Enabled")).into(),
        (BoundType::OneOf, AttributeValue::from("Disabled")).into(),
      ],
    };
    LegacyBaseTable::from([("Frequency".to_string(), frequency), ("Turbo".to_string(), turbo)])
  }

  #[test]
  fn upgrade_appends_empty_labels() {
    let current = legacy_to_current(legacy_table()).unwrap();

    let frequency = &current["Frequency"];
    assert_eq!(frequency.options.len(), 3);
    assert!(frequency.options.iter().all(|o| o.display_label.is_empty()));
    assert_eq!(frequency.options[2].kind, BoundType::ScalarIncrement);
    assert_eq!(frequency.default_value, AttributeValue::Integer(1600));

    let turbo = &current["Turbo"];
    assert!(turbo.read_only);
    assert_eq!(turbo.options[1].value, AttributeValue::from("Disabled"));
  }

  #[test]
  fn downgrade_reproduces_the_legacy_table() {
    let original = legacy_table();
    let current = legacy_to_current(original.clone()).unwrap();
    assert_eq!(current_to_legacy(&current).unwrap(), original);
  }

  #[test]
  fn downgrade_drops_labels() {
    let table = BaseTable::from([(
      "Turbo".to_string(),
      AttributeRecord::enumeration("On", &["On"]).with_options(vec![BoundOption::new(BoundType::OneOf, "On").with_label("Turbo on")]),
    )]);
    let legacy = current_to_legacy(&table).unwrap();
    let json = serde_json::to_value(&legacy["Turbo"].options).unwrap();
    assert_eq!(json, serde_json::json!([["OneOf", "On"]]));
  }

  #[test]
  fn mismatched_tag_fails_loudly() {
    let mut table = legacy_table();
    table.get_mut("Frequency").unwrap().current_value = "1800".into();

    let err = legacy_to_current(table).unwrap_err();
    assert_eq!(
      err,
      MigrationError::ValueTagMismatch {
        attribute: "Frequency".into(),
        field: "currentValue",
        attribute_type: AttributeType::Integer,
        expected: ValueTag::Integer,
        actual: ValueTag::String,
      }
    );
  }

  #[test]
  fn mismatched_default_fails_on_downgrade() {
    let mut record = AttributeRecord::enumeration("On", &["On", "Off"]);
    record.default_value = AttributeValue::Integer(0);
    let table = BaseTable::from([("Mode".to_string(), record)]);

    let err = current_to_legacy(&table).unwrap_err();
    assert!(matches!(err, MigrationError::ValueTagMismatch { field: "defaultValue", .. }));
  }
}
