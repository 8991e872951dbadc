//! `biosconf table` subcommands.

use std::path::Path;

use anyhow::{Result, bail};
use owo_colors::{OwoColorize, Stream};

use biosconf_lib::attribute::BaseTable;
use biosconf_lib::{BiosConfigService, Request, Response};

use super::{read_json_file, unexpected};
use crate::output::{OutputFormat, format_value, print_info, print_json, print_success, symbols};
use crate::prompts::confirm;

pub fn cmd_table_show(service: &mut BiosConfigService, format: OutputFormat) -> Result<()> {
  let table = match service.dispatch(Request::GetBaseBiosTable)? {
    Response::BaseBiosTable(table) => table,
    other => return Err(unexpected(other)),
  };

  if format.is_json() {
    return print_json(&table);
  }

  if table.is_empty() {
    print_info("Base BIOS table is empty.");
    return Ok(());
  }

  for (name, record) in &table {
    let lock = if record.read_only { symbols::LOCK } else { "" };
    println!(
      "  {} {} = {} {}",
      name,
      format!("({})", record.attribute_type).if_supports_color(Stream::Stdout, |s| s.dimmed()),
      format_value(&record.current_value),
      lock
    );
  }
  println!();
  print_info(&format!("{} attribute(s)", table.len()));
  Ok(())
}

/// Replace the table from `file`. Asks first if pending attributes would be dropped.
pub fn cmd_table_load(service: &mut BiosConfigService, file: &Path, yes: bool, format: OutputFormat) -> Result<()> {
  let table: BaseTable = read_json_file(file)?;

  let pending = service.manager().pending_attributes().len();
  if pending > 0 {
    let question = format!("Replacing the table drops {} pending attribute(s). Continue?", pending);
    if !confirm(&question, yes)? {
      bail!("Aborted");
    }
  }

  let loaded = match service.dispatch(Request::SetBaseBiosTable { table })? {
    Response::BaseBiosTable(table) => table.len(),
    other => return Err(unexpected(other)),
  };

  if format.is_json() {
    return print_json(&serde_json::json!({ "attributes": loaded, "droppedPending": pending }));
  }
  print_success(&format!("Loaded {} attribute(s) from {}", loaded, file.display()));
  Ok(())
}
