//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated project directory.
///
/// Each test gets its own temporary project root and cargo home, so the
/// builds it runs never touch the real toolchain directories.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create an empty project.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Create a project with the given `stagehand.toml`.
  pub fn with_config(content: &str) -> Self {
    let env = Self::empty();
    env.write_file("stagehand.toml", content);
    env
  }

  /// Project root.
  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Read a file relative to the project root.
  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative_path))
      .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
  }

  /// Cargo home (isolated per test).
  pub fn cargo_home(&self) -> PathBuf {
    let p = self.temp.path().join(".cargo-home");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Get a pre-configured Command for the stagehand binary.
  ///
  /// Runs in the project root with an isolated `CARGO_HOME` and without
  /// `RUST_LOG`, so stderr only carries errors.
  pub fn stagehand_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("stagehand");
    cmd.current_dir(self.root());
    cmd.arg("-C").arg(self.root());
    cmd.env("CARGO_HOME", self.cargo_home());
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
