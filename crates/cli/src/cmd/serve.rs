//! `biosconf serve`: a line-oriented JSON request loop.
//!
//! Each stdin line is one [`Request`]; each produces exactly one [`Reply`] line
//! on stdout. A line that does not parse is answered with an
//! `InvalidArgument` error and the loop continues. EOF ends the loop.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use biosconf_lib::consts::SERVICE_NAME;
use biosconf_lib::{BiosConfigService, BiosError, Reply, Request};

pub fn cmd_serve(service: &mut BiosConfigService) -> Result<()> {
  let stdin = io::stdin();
  let mut stdout = io::stdout().lock();
  let mut handled = 0usize;

  info!(service = SERVICE_NAME, "serving requests on stdin");
  let mut input = stdin.lock();
  let mut buf = Vec::new();
  loop {
    buf.clear();
    if input.read_until(b'\n', &mut buf).context("Failed to read request")? == 0 {
      break;
    }

    let reply = match std::str::from_utf8(&buf) {
      Ok(line) if line.trim().is_empty() => continue,
      Ok(line) => match serde_json::from_str::<Request>(line) {
        Ok(request) => Reply::from(service.dispatch(request)),
        Err(e) => {
          warn!(error = %e, "malformed request");
          Reply::from(Err(BiosError::invalid_argument(format!("malformed request: {e}"))))
        }
      },
      Err(e) => {
        warn!(error = %e, "request is not valid UTF-8");
        Reply::from(Err(BiosError::invalid_argument(format!("request is not valid UTF-8: {e}"))))
      }
    };

    let encoded = serde_json::to_string(&reply).context("Failed to encode reply")?;
    writeln!(stdout, "{}", encoded).context("Failed to write reply")?;
    stdout.flush().context("Failed to flush reply")?;
    handled += 1;
  }

  info!(handled, "stdin closed, stopping");
  Ok(())
}
