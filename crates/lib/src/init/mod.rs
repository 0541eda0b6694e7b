//! Scaffold a `stagehand.toml` for a project.
//!
//! The generated file documents the built-in targets and carries a commented
//! custom target. The binary name is detected from `Cargo.toml` when present.

mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::config::detect_binary_name;
use crate::consts::{CONFIG_FILENAME, DEFAULT_BINARY_NAME};

pub use templates::CONFIG_TEMPLATE;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },
}

/// Options for initializing a project.
pub struct InitOptions {
  /// Project directory; created if missing
  pub project_dir: PathBuf,
  /// Binary name to write; detected when `None`
  pub binary: Option<String>,
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  /// Path to the created config file
  pub config_path: PathBuf,
  /// Binary name written into it
  pub binary: String,
}

/// Write a starter `stagehand.toml` into the project directory.
///
/// # Errors
///
/// Returns an error if:
/// - the config file already exists
/// - directory creation fails
/// - file writing fails
pub fn init(options: &InitOptions) -> Result<InitResult, InitError> {
  let project_dir = &options.project_dir;

  fs::create_dir_all(project_dir).map_err(|e| InitError::CreateDir {
    path: project_dir.clone(),
    source: e,
  })?;

  let config_path = project_dir.join(CONFIG_FILENAME);
  if config_path.exists() {
    return Err(InitError::PathExists { path: config_path });
  }

  let binary = options
    .binary
    .clone()
    .or_else(|| detect_binary_name(project_dir))
    .unwrap_or_else(|| DEFAULT_BINARY_NAME.to_string());

  let content = render_config(&binary);
  write_file(&config_path, &content)?;
  info!(path = %config_path.display(), binary = %binary, "wrote config");

  Ok(InitResult { config_path, binary })
}

fn render_config(binary: &str) -> String {
  CONFIG_TEMPLATE.replace("{binary}", binary)
}

fn write_file(path: &Path, content: &str) -> Result<(), InitError> {
  fs::write(path, content).map_err(|e| InitError::WriteFile {
    path: path.to_path_buf(),
    source: e,
  })
}
