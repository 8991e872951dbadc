//! `biosconf secure-boot` subcommands.

use anyhow::Result;

use biosconf_lib::secure_boot::{CurrentBootType, ModeType};
use biosconf_lib::{BiosConfigService, Request, Response};

use super::unexpected;
use crate::output::{OutputFormat, print_json, print_stat, print_success};

pub fn cmd_secure_boot_show(service: &mut BiosConfigService, format: OutputFormat) -> Result<()> {
  let state = match service.dispatch(Request::GetSecureBoot)? {
    Response::SecureBoot(state) => state,
    other => return Err(unexpected(other)),
  };

  if format.is_json() {
    return print_json(&state);
  }
  print_stat("CurrentBoot", state.current_boot.as_str());
  print_stat("PendingEnable", &state.pending_enable.to_string());
  print_stat("Mode", state.mode.as_str());
  Ok(())
}

pub fn cmd_secure_boot_set_current(
  service: &mut BiosConfigService,
  value: CurrentBootType,
  format: OutputFormat,
) -> Result<()> {
  let value = match service.dispatch(Request::SetCurrentBoot { value })? {
    Response::CurrentBoot(value) => value,
    other => return Err(unexpected(other)),
  };
  report(format, "CurrentBoot", &value, value.as_str())
}

pub fn cmd_secure_boot_set_pending_enable(
  service: &mut BiosConfigService,
  value: bool,
  format: OutputFormat,
) -> Result<()> {
  let value = match service.dispatch(Request::SetPendingEnable { value })? {
    Response::PendingEnable(value) => value,
    other => return Err(unexpected(other)),
  };
  report(format, "PendingEnable", &value, &value.to_string())
}

pub fn cmd_secure_boot_set_mode(service: &mut BiosConfigService, value: ModeType, format: OutputFormat) -> Result<()> {
  let value = match service.dispatch(Request::SetMode { value })? {
    Response::Mode(value) => value,
    other => return Err(unexpected(other)),
  };
  report(format, "Mode", &value, value.as_str())
}

fn report<T: serde::Serialize>(format: OutputFormat, property: &str, value: &T, text: &str) -> Result<()> {
  if format.is_json() {
    return print_json(value);
  }
  print_success(&format!("{} set to {}", property, text));
  Ok(())
}
