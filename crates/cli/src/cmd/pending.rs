//! `biosconf pending` subcommands.

use std::path::Path;

use anyhow::Result;

use biosconf_lib::attribute::PendingAttributes;
use biosconf_lib::{BiosConfigService, Request, Response};

use super::{read_json_file, unexpected};
use crate::output::{OutputFormat, format_value, print_info, print_json, print_success, symbols};

fn submit(service: &mut BiosConfigService, attributes: PendingAttributes) -> Result<PendingAttributes> {
  match service.dispatch(Request::SetPendingAttributes { attributes })? {
    Response::PendingAttributes(pending) => Ok(pending),
    other => Err(unexpected(other)),
  }
}

pub fn cmd_pending_show(service: &mut BiosConfigService, format: OutputFormat) -> Result<()> {
  let pending = match service.dispatch(Request::GetPendingAttributes)? {
    Response::PendingAttributes(pending) => pending,
    other => return Err(unexpected(other)),
  };

  if format.is_json() {
    return print_json(&pending);
  }

  if pending.is_empty() {
    print_info("No pending attributes.");
    return Ok(());
  }
  for (name, attribute) in &pending {
    println!("  {} {} {}", name, symbols::ARROW, format_value(&attribute.value));
  }
  Ok(())
}

pub fn cmd_pending_clear(service: &mut BiosConfigService, format: OutputFormat) -> Result<()> {
  submit(service, PendingAttributes::new())?;

  if format.is_json() {
    return print_json(&PendingAttributes::new());
  }
  print_success("Pending attributes cleared");
  Ok(())
}

pub fn cmd_pending_load(service: &mut BiosConfigService, file: &Path, format: OutputFormat) -> Result<()> {
  let attributes: PendingAttributes = read_json_file(file)?;
  let submitted = attributes.len();
  let pending = submit(service, attributes)?;

  if format.is_json() {
    return print_json(&pending);
  }
  print_success(&format!(
    "Submitted {} attribute(s), {} pending in total",
    submitted,
    pending.len()
  ));
  Ok(())
}
