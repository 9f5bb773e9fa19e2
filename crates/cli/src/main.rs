mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// remstate - Remote state manager for declarative deployments
#[derive(Parser)]
#[command(name = "remstate")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Backend config file (default: ~/.config/remstate/backend.json if present, else local state)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Fetch the stored state and print it
  Pull {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show a summary of the stored state
  Show {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Write a snapshot file to the backend
  Push {
    /// Path to the snapshot JSON file
    file: PathBuf,

    /// Reason recorded in the lock while pushing
    #[arg(long, default_value = "push")]
    reason: String,

    /// Don't lock the state while pushing
    #[arg(long)]
    no_lock: bool,
  },

  /// Lock the stored state
  Lock {
    /// Reason recorded in the lock
    #[arg(long, default_value = "manual lock")]
    reason: String,
  },

  /// Remove the lock on the stored state, whoever holds it
  Unlock,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let config = cmd::load_backend_config(cli.config.as_deref())?;

  match cli.command {
    Commands::Pull { output } => cmd::cmd_pull(&config, output),
    Commands::Show { output } => cmd::cmd_show(&config, output),
    Commands::Push { file, reason, no_lock } => cmd::cmd_push(&config, &file, &reason, !no_lock),
    Commands::Lock { reason } => cmd::cmd_lock(&config, &reason),
    Commands::Unlock => cmd::cmd_unlock(&config),
  }
}
