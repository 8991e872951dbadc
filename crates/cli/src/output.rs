//! CLI output formatting utilities.
//!
//! Provides colored status messages, labelled stats, and the JSON output mode.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use biosconf_lib::attribute::AttributeValue;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const LOCK: &str = "🔒";
}

/// Render a boot order list, or `(empty)`.
pub fn format_list(items: &[String]) -> String {
  if items.is_empty() {
    "(empty)".to_string()
  } else {
    items.join(", ")
  }
}

/// Render an attribute value with strings quoted.
pub fn format_value(value: &AttributeValue) -> String {
  match value {
    AttributeValue::Integer(v) => v.to_string(),
    AttributeValue::String(s) => format!("\"{}\"", s),
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_list() {
    assert_eq!(format_list(&[]), "(empty)");
    assert_eq!(format_list(&["Boot0001".into(), "DISK".into()]), "Boot0001, DISK");
  }

  #[test]
  fn test_format_value() {
    assert_eq!(format_value(&AttributeValue::Integer(-4)), "-4");
    assert_eq!(format_value(&AttributeValue::from("Enabled")), "\"Enabled\"");
  }
}
