//! Implementation of the `stagehand init` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use stagehand_lib::init::{InitOptions, init};

use super::Globals;
use crate::output::symbols;

/// Execute the init command.
///
/// Writes a commented `stagehand.toml` into `dir` (or the project directory).
///
/// # Errors
///
/// Returns an error if the file already exists or cannot be written.
pub fn cmd_init(globals: &Globals, dir: Option<PathBuf>, binary: Option<String>) -> Result<()> {
  let options = InitOptions {
    project_dir: dir.unwrap_or_else(|| globals.project_dir.clone()),
    binary,
  };

  let result = init(&options).context("Failed to initialize configuration")?;

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    "Initialized stagehand configuration!".green().bold()
  );
  println!();
  println!(
    "  {} Config: {}",
    symbols::INFO.cyan(),
    result.config_path.display()
  );
  println!("  {} Binary: {}", symbols::INFO.cyan(), result.binary);
  println!();
  println!("{}", "Next steps:".bold());
  println!("  1. Run: {}", "stagehand check".cyan());
  println!("  2. Run: {}", "stagehand build --all".cyan());

  Ok(())
}
