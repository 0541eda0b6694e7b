mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::Globals;
use crate::output::OutputFormat;

/// stagehand - build and stage artifacts for several platforms
#[derive(Parser)]
#[command(name = "stagehand")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project directory (default: current directory)
  #[arg(short = 'C', long, global = true, default_value = ".")]
  project_dir: PathBuf,

  /// Config file (default: <project-dir>/stagehand.toml if present)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Capture installer and build output instead of streaming it
  #[arg(short, long, global = true)]
  quiet: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value = "text")]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Check prerequisites, install what is missing, build and stage artifacts
  Build {
    /// Targets to build, by name or alias
    #[arg(required_unless_present = "all")]
    targets: Vec<String>,

    /// Build every known target
    #[arg(long, conflicts_with = "targets")]
    all: bool,
  },

  /// Report prerequisite status without installing anything
  Check {
    /// Targets to check (default: all)
    targets: Vec<String>,
  },

  /// List known targets
  List,

  /// Write a starter stagehand.toml
  Init {
    /// Directory to initialize (default: the project directory)
    dir: Option<PathBuf>,

    /// Binary name to record (default: detected from Cargo.toml)
    #[arg(long)]
    binary: Option<String>,
  },

  /// Show host platform and tool directories
  Info,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let globals = Globals {
    project_dir: cli.project_dir,
    config: cli.config,
    quiet: cli.quiet,
    output: cli.output,
  };

  match cli.command {
    Commands::Build { targets, all } => cmd::cmd_build(&globals, &targets, all),
    Commands::Check { targets } => cmd::cmd_check(&globals, &targets),
    Commands::List => cmd::cmd_list(&globals),
    Commands::Init { dir, binary } => cmd::cmd_init(&globals, dir, binary),
    Commands::Info => cmd::cmd_info(&globals),
  }
}
