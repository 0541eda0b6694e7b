//! Scoped environment overlay for subprocesses.
//!
//! Tools installed during a run (rustup, `cargo install`) land in directories
//! that may not be on the caller's `PATH` yet. Instead of mutating the
//! process environment, every subprocess gets an explicit overlay: extra
//! variables plus a search-path prefix. Dropping the overlay ends its scope.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

/// Environment overrides applied to every subprocess of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
  /// Variables set on each child process.
  pub vars: BTreeMap<String, String>,
  /// Directories searched before the inherited `PATH`, in order.
  pub path_prefix: Vec<PathBuf>,
  base_path: Option<OsString>,
}

impl EnvOverlay {
  /// Create an empty overlay on top of the current process `PATH`.
  pub fn new() -> Self {
    Self {
      vars: BTreeMap::new(),
      path_prefix: Vec::new(),
      base_path: std::env::var_os("PATH"),
    }
  }

  /// Replace the inherited `PATH` this overlay extends.
  pub fn with_base_path(mut self, base_path: Option<OsString>) -> Self {
    self.base_path = base_path;
    self
  }

  pub fn with_var(mut self, key: &str, value: &str) -> Self {
    self.vars.insert(key.to_string(), value.to_string());
    self
  }

  /// Prepend a directory to the search path, skipping duplicates.
  pub fn prepend_path(&mut self, dir: PathBuf) {
    if !self.path_prefix.contains(&dir) {
      self.path_prefix.push(dir);
    }
  }

  /// The effective search path for children: prefix, then inherited entries.
  ///
  /// A `PATH` var set explicitly in `vars` takes the place of the inherited one.
  pub fn search_path(&self) -> Vec<PathBuf> {
    let mut dirs = self.path_prefix.clone();
    let base = match self.vars.get("PATH") {
      Some(path) => Some(OsString::from(path)),
      None => self.base_path.clone(),
    };
    if let Some(base) = base {
      dirs.extend(std::env::split_paths(&base).filter(|p| !p.as_os_str().is_empty()));
    }
    dirs
  }

  /// The joined `PATH` value handed to children.
  pub fn joined_path(&self) -> Option<OsString> {
    std::env::join_paths(self.search_path()).ok()
  }

  /// Find an executable on the overlaid search path.
  ///
  /// Names containing a path separator are checked directly, relative to
  /// `base` (the directory the command runs in), never this process's cwd.
  pub fn resolve_executable(&self, name: &str, base: &Path) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
      return executable_names(name)
        .into_iter()
        .map(|file| base.join(file))
        .find(|path| is_executable(path));
    }

    self.search_path().into_iter().find_map(|dir| {
      executable_names(name)
        .into_iter()
        .map(|file| dir.join(file))
        .find(|path| is_executable(path))
    })
  }

  /// Apply the overlay to a child command without touching this process.
  pub fn apply(&self, command: &mut Command) {
    for (key, value) in &self.vars {
      if key != "PATH" {
        command.env(key, value);
      }
    }
    if let Some(path) = self.joined_path() {
      debug!(path = ?path, "child search path");
      command.env("PATH", path);
    }
  }
}

#[cfg(windows)]
fn executable_names(name: &str) -> Vec<String> {
  if Path::new(name).extension().is_some() {
    return vec![name.to_string()];
  }
  let exts = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
  let mut names: Vec<String> = exts
    .split(';')
    .filter(|ext| !ext.is_empty())
    .map(|ext| format!("{}{}", name, ext.to_ascii_lowercase()))
    .collect();
  names.push(name.to_string());
  names
}

#[cfg(not(windows))]
fn executable_names(name: &str) -> Vec<String> {
  vec![name.to_string()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
  use std::os::unix::fs::PermissionsExt;

  path
    .metadata()
    .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
    .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
  path.is_file()
}
