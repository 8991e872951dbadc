mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use biosconf_lib::attribute::ResetFlag;
use biosconf_lib::consts::{APP_NAME, DEFAULT_PERSIST_PATH, PERSIST_PATH_ENV};
use biosconf_lib::persist::SchemaVersion;
use biosconf_lib::secure_boot::{CurrentBootType, ModeType};
use biosconf_lib::{BiosConfigService, ServiceConfig};

use crate::output::{OutputFormat, print_error};

/// biosconf - BIOS configuration manager for a BMC
#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Directory holding persisted BIOS state
  #[arg(long, global = true, env = PERSIST_PATH_ENV, default_value = DEFAULT_PERSIST_PATH)]
  persist_path: PathBuf,

  /// Do not host the secure boot object
  #[arg(long, global = true)]
  no_secure_boot: bool,

  /// Layout used when writing the BIOS data file (legacy or current)
  #[arg(long, global = true, default_value = "current")]
  table_format: SchemaVersion,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show an attribute's type, current value, and pending value
  Get {
    /// Attribute name
    name: String,
  },

  /// Stage a new value for an attribute
  Set {
    /// Attribute name
    name: String,
    /// New value; parsed as an integer for integer attributes
    value: String,
  },

  /// Inspect or replace the base BIOS table
  Table {
    #[command(subcommand)]
    action: TableAction,
  },

  /// Inspect or change pending attributes
  Pending {
    #[command(subcommand)]
    action: PendingAction,
  },

  /// Inspect or request a BIOS settings reset
  Reset {
    #[command(subcommand)]
    action: ResetAction,
  },

  /// Inspect or change the boot order
  BootOrder {
    #[command(subcommand)]
    action: BootOrderAction,
  },

  /// Inspect or change secure boot state
  SecureBoot {
    #[command(subcommand)]
    action: SecureBootAction,
  },

  /// Manage the BIOS password
  Password {
    #[command(subcommand)]
    action: PasswordAction,
  },

  /// Serve JSON requests from stdin, one per line
  Serve,
}

#[derive(Subcommand)]
enum TableAction {
  /// Print the base BIOS table
  Show,
  /// Replace the base BIOS table from a JSON file
  Load {
    /// Path to the table JSON
    file: PathBuf,
    /// Drop pending attributes without asking
    #[arg(short, long)]
    yes: bool,
  },
}

#[derive(Subcommand)]
enum PendingAction {
  /// Print pending attributes
  Show,
  /// Drop all pending attributes
  Clear,
  /// Submit pending attributes from a JSON file
  Load {
    /// Path to the pending attributes JSON
    file: PathBuf,
  },
}

#[derive(Subcommand)]
enum ResetAction {
  /// Print the reset flag
  Show,
  /// Set the reset flag
  Set {
    /// NoAction, FactoryDefaults, or FailSafeDefaults
    flag: ResetFlag,
  },
}

#[derive(Subcommand)]
enum BootOrderAction {
  /// Print the current and pending boot order
  Show,
  /// Replace the current boot order
  Set {
    /// Boot devices in order
    tokens: Vec<String>,
  },
  /// Replace the pending boot order
  SetPending {
    /// Boot devices in order
    tokens: Vec<String>,
  },
}

#[derive(Subcommand)]
enum SecureBootAction {
  /// Print secure boot state
  Show,
  /// Set the current boot type
  SetCurrent {
    /// Unknown, Disabled, or Enabled
    value: CurrentBootType,
  },
  /// Request secure boot on the next boot
  SetPendingEnable {
    #[arg(action = clap::ArgAction::Set)]
    value: bool,
  },
  /// Set the provisioning mode
  SetMode {
    /// Unknown, Setup, User, Audit, or Deployed
    value: ModeType,
  },
}

#[derive(Subcommand)]
enum PasswordAction {
  /// Change the BIOS password
  ///
  /// The current and new passwords are read from stdin, one per line.
  Change {
    /// Role whose current password is checked (AdminPassword or UserPassword)
    #[arg(long)]
    user: String,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(e) = run(cli) {
    print_error(&format!("{e:#}"));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  let config = ServiceConfig::new(cli.persist_path)
    .with_secure_boot(!cli.no_secure_boot)
    .with_table_format(cli.table_format);
  let mut service = BiosConfigService::open(&config)
    .with_context(|| format!("Failed to open BIOS state in {}", config.persist_dir().display()))?;
  let format = cli.output;

  match cli.command {
    Commands::Get { name } => cmd::cmd_get(&mut service, name, format),
    Commands::Set { name, value } => cmd::cmd_set(&mut service, name, value, format),
    Commands::Table { action } => match action {
      TableAction::Show => cmd::cmd_table_show(&mut service, format),
      TableAction::Load { file, yes } => cmd::cmd_table_load(&mut service, &file, yes, format),
    },
    Commands::Pending { action } => match action {
      PendingAction::Show => cmd::cmd_pending_show(&mut service, format),
      PendingAction::Clear => cmd::cmd_pending_clear(&mut service, format),
      PendingAction::Load { file } => cmd::cmd_pending_load(&mut service, &file, format),
    },
    Commands::Reset { action } => match action {
      ResetAction::Show => cmd::cmd_reset_show(&mut service, format),
      ResetAction::Set { flag } => cmd::cmd_reset_set(&mut service, flag, format),
    },
    Commands::BootOrder { action } => match action {
      BootOrderAction::Show => cmd::cmd_boot_order_show(&mut service, format),
      BootOrderAction::Set { tokens } => cmd::cmd_boot_order_set(&mut service, tokens, false, format),
      BootOrderAction::SetPending { tokens } => cmd::cmd_boot_order_set(&mut service, tokens, true, format),
    },
    Commands::SecureBoot { action } => match action {
      SecureBootAction::Show => cmd::cmd_secure_boot_show(&mut service, format),
      SecureBootAction::SetCurrent { value } => cmd::cmd_secure_boot_set_current(&mut service, value, format),
      SecureBootAction::SetPendingEnable { value } => {
        cmd::cmd_secure_boot_set_pending_enable(&mut service, value, format)
      }
      SecureBootAction::SetMode { value } => cmd::cmd_secure_boot_set_mode(&mut service, value, format),
    },
    Commands::Password { action } => match action {
      PasswordAction::Change { user } => cmd::cmd_password_change(&mut service, user, format),
    },
    Commands::Serve => cmd::cmd_serve(&mut service),
  }
}
