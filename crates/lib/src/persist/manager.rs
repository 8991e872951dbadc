//! Versioned storage for the base BIOS table and pending attributes.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "baseBiosTable": { "Turbo": { "attributeType": "Enumeration", ... } },
//!   "pendingAttributes": { "Turbo": ["Enumeration", "Disabled"] }
//! }
//! ```
//!
//! Version 0 files have the same layout but store bound rules as pairs; see
//! [`super::migrate`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::migrate::{LegacyBaseTable, current_to_legacy, legacy_to_current};
use super::{PersistError, parse, read_optional, write_json};
use crate::attribute::{BaseTable, PendingAttributes};

/// Known layouts of the manager data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVersion {
  /// Bound rules without display labels.
  Legacy,
  /// Bound rules with display labels.
  #[default]
  Current,
}

impl SchemaVersion {
  pub fn tag(self) -> u32 {
    match self {
      SchemaVersion::Legacy => 0,
      SchemaVersion::Current => 1,
    }
  }

  pub fn from_tag(tag: u32) -> Option<Self> {
    match tag {
      0 => Some(SchemaVersion::Legacy),
      1 => Some(SchemaVersion::Current),
      _ => None,
    }
  }
}

impl fmt::Display for SchemaVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SchemaVersion::Legacy => f.write_str("legacy"),
      SchemaVersion::Current => f.write_str("current"),
    }
  }
}

impl FromStr for SchemaVersion {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "legacy" | "0" => Ok(SchemaVersion::Legacy),
      "current" | "1" => Ok(SchemaVersion::Current),
      other => Err(format!("unknown schema version '{other}', expected 'legacy' or 'current'")),
    }
  }
}

/// In-memory contents of the manager data file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerData {
  pub base_bios_table: BaseTable,
  pub pending_attributes: PendingAttributes,
}

#[derive(Deserialize)]
struct VersionProbe {
  version: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CurrentDocumentRef<'a> {
  version: u32,
  base_bios_table: &'a BaseTable,
  pending_attributes: &'a PendingAttributes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentDocument {
  base_bios_table: BaseTable,
  pending_attributes: PendingAttributes,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LegacyDocumentRef<'a> {
  version: u32,
  base_bios_table: LegacyBaseTable,
  pending_attributes: &'a PendingAttributes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyDocument {
  base_bios_table: LegacyBaseTable,
  pending_attributes: PendingAttributes,
}

/// Reads and writes the manager data file.
#[derive(Debug, Clone)]
pub struct ManagerStore {
  path: PathBuf,
  write_format: SchemaVersion,
}

impl ManagerStore {
  /// Store at `path` that writes files in `write_format`.
  pub fn new(path: PathBuf, write_format: SchemaVersion) -> Self {
    Self { path, write_format }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn write_format(&self) -> SchemaVersion {
    self.write_format
  }

  /// Load the data file, converting it from whatever version it was stored in.
  ///
  /// Returns `Ok(None)` if the file doesn't exist.
  pub fn load(&self) -> Result<Option<ManagerData>, PersistError> {
    let Some(content) = read_optional(&self.path)? else {
      return Ok(None);
    };

    let probe: VersionProbe = parse(&self.path, &content)?;
    let Some(stored) = SchemaVersion::from_tag(probe.version) else {
      return Err(PersistError::UnsupportedVersion {
        path: self.path.clone(),
        found: probe.version,
      });
    };

    let data = match stored {
      SchemaVersion::Current => {
        let doc: CurrentDocument = parse(&self.path, &content)?;
        ManagerData {
          base_bios_table: doc.base_bios_table,
          pending_attributes: doc.pending_attributes,
        }
      }
      SchemaVersion::Legacy => {
        let doc: LegacyDocument = parse(&self.path, &content)?;
        info!(path = %self.path.display(), "upgrading legacy BIOS table");
        ManagerData {
          base_bios_table: legacy_to_current(doc.base_bios_table)?,
          pending_attributes: doc.pending_attributes,
        }
      }
    };

    info!(
      path = %self.path.display(),
      version = probe.version,
      attributes = data.base_bios_table.len(),
      pending = data.pending_attributes.len(),
      "BIOS data loaded"
    );
    Ok(Some(data))
  }

  /// Write the table and pending set in this store's format.
  pub fn save(&self, table: &BaseTable, pending: &PendingAttributes) -> Result<(), PersistError> {
    match self.write_format {
      SchemaVersion::Current => write_json(
        &self.path,
        &CurrentDocumentRef {
          version: SchemaVersion::Current.tag(),
          base_bios_table: table,
          pending_attributes: pending,
        },
      ),
      SchemaVersion::Legacy => write_json(
        &self.path,
        &LegacyDocumentRef {
          version: SchemaVersion::Legacy.tag(),
          base_bios_table: current_to_legacy(table)?,
          pending_attributes: pending,
        },
      ),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::attribute::{AttributeRecord, AttributeType, AttributeValue, BoundOption, BoundType, PendingAttribute};
  use tempfile::TempDir;

  fn sample_table() -> BaseTable {
    BaseTable::from([
      (
        "Frequency".to_string(),
        AttributeRecord::integer(1800, 800, 3200, 100).with_display_name("CPU Frequency"),
      ),
      (
        "Turbo".to_string(),
        AttributeRecord::enumeration("Enabled", &["Enabled", "Disabled"])
          .with_options(vec![
            BoundOption::new(BoundType::OneOf, "Enabled").with_label("On"),
            BoundOption::new(BoundType::OneOf, "Disabled").with_label("Off"),
          ])
          .read_only(),
      ),
      ("HostName".to_string(), AttributeRecord::string("bmc", 1, 64)),
    ])
  }

  fn sample_pending() -> PendingAttributes {
    PendingAttributes::from([(
      "Frequency".to_string(),
      PendingAttribute::new(AttributeType::Integer, 2000_i64),
    )])
  }

  #[test]
  fn round_trip_current_format() {
    let temp = TempDir::new().unwrap();
    let store = ManagerStore::new(temp.path().join("biosData"), SchemaVersion::Current);

    store.save(&sample_table(), &sample_pending()).unwrap();
    let data = store.load().unwrap().unwrap();

    assert_eq!(data.base_bios_table, sample_table());
    assert_eq!(data.pending_attributes, sample_pending());
  }

  #[test]
  fn legacy_file_loads_as_current_shape() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("biosData");
    std::fs::write(
      &path,
      r#"{
        "version": 0,
        "baseBiosTable": {
          "Turbo": {
            "attributeType": "Enumeration",
            "readOnly": false,
            "displayName": "Turbo",
            "description": "",
            "menuPath": "./Processor",
            "currentValue": "Enabled",
            "defaultValue": "Enabled",
            "options": [["OneOf", "Enabled"], ["OneOf", "Disabled"]]
          }
        },
        "pendingAttributes": { "Turbo": ["Enumeration", "Disabled"] }
      }"#,
    )
    .unwrap();

    let data = ManagerStore::new(path, SchemaVersion::Current).load().unwrap().unwrap();
    let turbo = &data.base_bios_table["Turbo"];
    assert_eq!(turbo.options.len(), 2);
    assert_eq!(turbo.options[0].display_label, "");
    assert_eq!(data.pending_attributes["Turbo"].value, AttributeValue::from("Disabled"));
  }

  #[test]
  fn legacy_writer_round_trips_without_labels() {
    let temp = TempDir::new().unwrap();
    let store = ManagerStore::new(temp.path().join("biosData"), SchemaVersion::Legacy);
    let table = BaseTable::from([("Frequency".to_string(), AttributeRecord::integer(1800, 800, 3200, 100))]);

    store.save(&table, &PendingAttributes::new()).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["version"], 0);
    assert_eq!(raw["baseBiosTable"]["Frequency"]["options"][0], serde_json::json!(["LowerBound", 800]));

    let data = store.load().unwrap().unwrap();
    assert_eq!(data.base_bios_table, table);
  }

  #[test]
  fn unknown_version_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("biosData");
    std::fs::write(&path, r#"{"version": 7, "baseBiosTable": {}, "pendingAttributes": {}}"#).unwrap();

    match ManagerStore::new(path, SchemaVersion::Current).load() {
      Err(PersistError::UnsupportedVersion { found: 7, .. }) => {}
      other => panic!("expected UnsupportedVersion, got: {:?}", other),
    }
  }

  #[test]
  fn missing_file_is_none() {
    let temp = TempDir::new().unwrap();
    let store = ManagerStore::new(temp.path().join("biosData"), SchemaVersion::Current);
    assert!(store.load().unwrap().is_none());
  }

  #[test]
  fn schema_version_parses_names_and_tags() {
    assert_eq!("legacy".parse::<SchemaVersion>().unwrap(), SchemaVersion::Legacy);
    assert_eq!("1".parse::<SchemaVersion>().unwrap(), SchemaVersion::Current);
    assert!("2".parse::<SchemaVersion>().is_err());
    assert_eq!(SchemaVersion::from_tag(SchemaVersion::Legacy.tag()), Some(SchemaVersion::Legacy));
  }
}
