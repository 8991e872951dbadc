//! `biosconf boot-order` subcommands.

use anyhow::Result;

use biosconf_lib::{BiosConfigService, Request, Response};

use super::unexpected;
use crate::output::{OutputFormat, format_list, print_json, print_stat, print_success};

fn order_of(response: Response) -> Result<Vec<String>> {
  match response {
    Response::BootOrder(order) => Ok(order),
    other => Err(unexpected(other)),
  }
}

pub fn cmd_boot_order_show(service: &mut BiosConfigService, format: OutputFormat) -> Result<()> {
  let current = order_of(service.dispatch(Request::GetBootOrder)?)?;
  let pending = order_of(service.dispatch(Request::GetPendingBootOrder)?)?;

  if format.is_json() {
    return print_json(&serde_json::json!({ "bootOrder": current, "pendingBootOrder": pending }));
  }
  print_stat("Current", &format_list(&current));
  print_stat("Pending", &format_list(&pending));
  Ok(())
}

/// Replace the current list, or the pending one when `pending` is set.
pub fn cmd_boot_order_set(
  service: &mut BiosConfigService,
  tokens: Vec<String>,
  pending: bool,
  format: OutputFormat,
) -> Result<()> {
  let request = if pending {
    Request::SetPendingBootOrder { order: tokens }
  } else {
    Request::SetBootOrder { order: tokens }
  };
  let order = order_of(service.dispatch(request)?)?;

  if format.is_json() {
    return print_json(&order);
  }
  let which = if pending { "Pending boot order" } else { "Boot order" };
  print_success(&format!("{} set: {}", which, format_list(&order)));
  Ok(())
}
