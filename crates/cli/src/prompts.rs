use anyhow::{Context, Result, bail};
use std::io::{self, IsTerminal, Write};

/// Ask a yes/no question on stderr. `assume_yes` skips the prompt.
pub fn confirm(message: &str, assume_yes: bool) -> Result<bool> {
  if assume_yes {
    return Ok(true);
  }

  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!("Refusing to continue without confirmation in non-interactive mode. Use --yes to proceed.");
  }

  write!(io::stderr(), "{} [y/N] ", message)?;
  io::stderr().flush()?;

  let mut answer = String::new();
  io::stdin().read_line(&mut answer)?;

  Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Read one line from stdin without its line ending. On a terminal the
/// `label` is shown on stderr first.
pub fn read_secret(label: &str) -> Result<String> {
  if io::stdin().is_terminal() {
    write!(io::stderr(), "{}: ", label)?;
    io::stderr().flush()?;
  }

  let mut line = String::new();
  let read = io::stdin()
    .read_line(&mut line)
    .with_context(|| format!("Failed to read {}", label.to_lowercase()))?;
  if read == 0 {
    bail!("{} was not provided on stdin", label);
  }

  Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
