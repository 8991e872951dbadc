use anyhow::Result;

use biosconf_lib::{BiosConfigService, Request};

use crate::output::{OutputFormat, print_json, print_success};
use crate::prompts::read_secret;

pub fn cmd_password_change(service: &mut BiosConfigService, user_name: String, format: OutputFormat) -> Result<()> {
  let current_password = read_secret("Current password")?;
  let new_password = read_secret("New password")?;

  service.dispatch(Request::ChangePassword {
    user_name: user_name.clone(),
    current_password,
    new_password,
  })?;

  if format.is_json() {
    return print_json(&serde_json::json!({ "changed": true, "user": user_name }));
  }
  print_success(&format!("Password changed for {}", user_name));
  Ok(())
}
