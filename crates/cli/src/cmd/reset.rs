use anyhow::Result;

use biosconf_lib::attribute::ResetFlag;
use biosconf_lib::{BiosConfigService, Request, Response};

use super::unexpected;
use crate::output::{OutputFormat, print_json, print_stat, print_success};

fn flag_of(response: Response) -> Result<ResetFlag> {
  match response {
    Response::ResetBiosSettings(flag) => Ok(flag),
    other => Err(unexpected(other)),
  }
}

pub fn cmd_reset_show(service: &mut BiosConfigService, format: OutputFormat) -> Result<()> {
  let flag = flag_of(service.dispatch(Request::GetResetBiosSettings)?)?;

  if format.is_json() {
    return print_json(&flag);
  }
  print_stat("ResetBIOSSettings", flag.as_str());
  Ok(())
}

pub fn cmd_reset_set(service: &mut BiosConfigService, flag: ResetFlag, format: OutputFormat) -> Result<()> {
  let flag = flag_of(service.dispatch(Request::SetResetBiosSettings { flag })?)?;

  if format.is_json() {
    return print_json(&flag);
  }
  print_success(&format!("Reset flag set to {}", flag));
  Ok(())
}
