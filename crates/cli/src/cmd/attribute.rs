//! `biosconf get` and `biosconf set`.

use anyhow::{Context, Result};

use biosconf_lib::attribute::{AttributeType, AttributeValue};
use biosconf_lib::{BiosConfigService, Request, Response};

use super::unexpected;
use crate::output::{OutputFormat, format_value, print_json, print_stat, print_success};

pub fn cmd_get(service: &mut BiosConfigService, name: String, format: OutputFormat) -> Result<()> {
  let details = match service.dispatch(Request::GetAttribute { name: name.clone() })? {
    Response::Attribute(details) => details,
    other => return Err(unexpected(other)),
  };

  if format.is_json() {
    return print_json(&details);
  }

  println!("{}", name);
  print_stat("Type", details.attribute_type.as_str());
  print_stat("Current", &format_value(&details.current_value));
  let pending = match &details.pending_value {
    Some(value) => format_value(value),
    None => "(none)".to_string(),
  };
  print_stat("Pending", &pending);
  Ok(())
}

/// Stage `raw` for `name`, parsing it as an integer when the attribute is one.
pub fn cmd_set(service: &mut BiosConfigService, name: String, raw: String, format: OutputFormat) -> Result<()> {
  let declared = service
    .manager()
    .base_bios_table()
    .get(&name)
    .map(|record| record.attribute_type);

  let value = match declared {
    Some(AttributeType::Integer) => {
      let parsed: i64 = raw
        .parse()
        .with_context(|| format!("'{}' is an integer attribute, got '{}'", name, raw))?;
      AttributeValue::Integer(parsed)
    }
    _ => AttributeValue::String(raw),
  };

  service.dispatch(Request::SetAttribute {
    name: name.clone(),
    value: value.clone(),
  })?;

  if format.is_json() {
    return print_json(&serde_json::json!({ "name": name, "pendingValue": value }));
  }
  print_success(&format!("{} staged as {}", name, format_value(&value)));
  Ok(())
}
