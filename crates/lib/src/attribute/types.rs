//! Attribute table data model.
//!
//! # Example Table Entry
//!
//! ```json
//! {
//!   "Frequency": {
//!     "attributeType": "Integer",
//!     "readOnly": false,
//!     "displayName": "CPU Frequency",
//!     "description": "Core frequency in MHz",
//!     "menuPath": "./Processor",
//!     "currentValue": 1800,
//!     "defaultValue": 1800,
//!     "options": [["LowerBound", 800, ""], ["UpperBound", 3200, ""], ["ScalarIncrement", 100, ""]]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bus_enum::bus_enum;

bus_enum! {
  /// Declared type of a BIOS attribute.
  pub enum AttributeType in "xyz.openbmc_project.BIOSConfig.Manager.AttributeType" {
    Enumeration,
    String,
    Integer,
  }
}

impl AttributeType {
  /// The value tag that current, default, and pending values must carry.
  pub fn value_tag(self) -> ValueTag {
    match self {
      AttributeType::Integer => ValueTag::Integer,
      AttributeType::Enumeration | AttributeType::String => ValueTag::String,
    }
  }
}

bus_enum! {
  /// Kind of a single bound rule attached to an attribute.
  pub enum BoundType in "xyz.openbmc_project.BIOSConfig.Manager.BoundType" {
    OneOf,
    LowerBound,
    UpperBound,
    ScalarIncrement,
    MinStringLength,
    MaxStringLength,
  }
}

bus_enum! {
  /// Request for the firmware to reset its settings on the next boot.
  #[derive(Default)]
  pub enum ResetFlag in "xyz.openbmc_project.BIOSConfig.Manager.ResetFlag" {
    #[default]
    NoAction,
    FactoryDefaults,
    FailSafeDefaults,
  }
}

/// Which arm of [`AttributeValue`] a value occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTag {
  Integer,
  String,
}

impl fmt::Display for ValueTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValueTag::Integer => f.write_str("integer"),
      ValueTag::String => f.write_str("string"),
    }
  }
}

/// An attribute or bound value: a signed 64-bit integer or a string.
///
/// Serialized untagged, so a JSON number is an integer and a JSON string is a
/// string. Any other JSON type is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
  Integer(i64),
  String(String),
}

impl AttributeValue {
  pub fn tag(&self) -> ValueTag {
    match self {
      AttributeValue::Integer(_) => ValueTag::Integer,
      AttributeValue::String(_) => ValueTag::String,
    }
  }

  pub fn as_integer(&self) -> Option<i64> {
    match self {
      AttributeValue::Integer(v) => Some(*v),
      AttributeValue::String(_) => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      AttributeValue::Integer(_) => None,
      AttributeValue::String(s) => Some(s),
    }
  }
}

impl fmt::Display for AttributeValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AttributeValue::Integer(v) => write!(f, "{v}"),
      AttributeValue::String(s) => write!(f, "{s:?}"),
    }
  }
}

impl From<i64> for AttributeValue {
  fn from(value: i64) -> Self {
    AttributeValue::Integer(value)
  }
}

impl From<String> for AttributeValue {
  fn from(value: String) -> Self {
    AttributeValue::String(value)
  }
}

impl From<&str> for AttributeValue {
  fn from(value: &str) -> Self {
    AttributeValue::String(value.to_string())
  }
}

/// One bound rule: kind, value, and a human readable label.
///
/// Persisted as a `[kind, value, label]` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
  from = "(BoundType, AttributeValue, String)",
  into = "(BoundType, AttributeValue, String)"
)]
pub struct BoundOption {
  pub kind: BoundType,
  pub value: AttributeValue,
  pub display_label: String,
}

impl BoundOption {
  pub fn new(kind: BoundType, value: impl Into<AttributeValue>) -> Self {
    Self {
      kind,
      value: value.into(),
      display_label: String::new(),
    }
  }

  pub fn with_label(mut self, label: impl Into<String>) -> Self {
    self.display_label = label.into();
    self
  }
}

impl From<(BoundType, AttributeValue, String)> for BoundOption {
  fn from((kind, value, display_label): (BoundType, AttributeValue, String)) -> Self {
    Self {
      kind,
      value,
      display_label,
    }
  }
}

impl From<BoundOption> for (BoundType, AttributeValue, String) {
  fn from(option: BoundOption) -> Self {
    (option.kind, option.value, option.display_label)
  }
}

/// One row of the base BIOS table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRecord {
  pub attribute_type: AttributeType,
  pub read_only: bool,
  pub display_name: String,
  pub description: String,
  pub menu_path: String,
  pub current_value: AttributeValue,
  pub default_value: AttributeValue,
  pub options: Vec<BoundOption>,
}

impl AttributeRecord {
  /// Integer attribute with a `[lower, upper]` range stepping by `increment`.
  pub fn integer(current: i64, lower: i64, upper: i64, increment: i64) -> Self {
    Self::bare(AttributeType::Integer, current.into()).with_options(vec![
      BoundOption::new(BoundType::LowerBound, lower),
      BoundOption::new(BoundType::UpperBound, upper),
      BoundOption::new(BoundType::ScalarIncrement, increment),
    ])
  }

  /// Enumeration attribute accepting exactly `choices`.
  pub fn enumeration(current: &str, choices: &[&str]) -> Self {
    let options = choices
      .iter()
      .map(|choice| BoundOption::new(BoundType::OneOf, *choice))
      .collect();
    Self::bare(AttributeType::Enumeration, current.into()).with_options(options)
  }

  /// String attribute whose length must fall in `[min_len, max_len]`.
  pub fn string(current: &str, min_len: i64, max_len: i64) -> Self {
    Self::bare(AttributeType::String, current.into()).with_options(vec![
      BoundOption::new(BoundType::MinStringLength, min_len),
      BoundOption::new(BoundType::MaxStringLength, max_len),
    ])
  }

  /// Record with no bound rules and no metadata. Default equals current.
  pub fn bare(attribute_type: AttributeType, current: AttributeValue) -> Self {
    Self {
      attribute_type,
      read_only: false,
      display_name: String::new(),
      description: String::new(),
      menu_path: String::new(),
      default_value: current.clone(),
      current_value: current,
      options: Vec::new(),
    }
  }

  pub fn with_options(mut self, options: Vec<BoundOption>) -> Self {
    self.options = options;
    self
  }

  pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
    self.display_name = name.into();
    self
  }

  pub fn read_only(mut self) -> Self {
    self.read_only = true;
    self
  }
}

/// The base BIOS table, keyed by attribute name.
pub type BaseTable = BTreeMap<String, AttributeRecord>;

/// A proposed new value together with the type the caller claims for it.
///
/// Persisted as a `[type, value]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(AttributeType, AttributeValue)", into = "(AttributeType, AttributeValue)")]
pub struct PendingAttribute {
  pub attribute_type: AttributeType,
  pub value: AttributeValue,
}

impl PendingAttribute {
  pub fn new(attribute_type: AttributeType, value: impl Into<AttributeValue>) -> Self {
    Self {
      attribute_type,
      value: value.into(),
    }
  }
}

impl From<(AttributeType, AttributeValue)> for PendingAttribute {
  fn from((attribute_type, value): (AttributeType, AttributeValue)) -> Self {
    Self { attribute_type, value }
  }
}

impl From<PendingAttribute> for (AttributeType, AttributeValue) {
  fn from(pending: PendingAttribute) -> Self {
    (pending.attribute_type, pending.value)
  }
}

/// Pending changes, keyed by attribute name.
pub type PendingAttributes = BTreeMap<String, PendingAttribute>;

/// Result of looking up a single attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDetails {
  pub attribute_type: AttributeType,
  pub current_value: AttributeValue,
  /// `None` only for an integer attribute with nothing pending. A string
  /// attribute with nothing pending reports an empty string.
  pub pending_value: Option<AttributeValue>,
}
