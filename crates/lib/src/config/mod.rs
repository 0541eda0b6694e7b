//! Project configuration.
//!
//! An optional `stagehand.toml` in the project root sets the binary name,
//! environment for every subprocess, and custom targets. Targets named like a
//! built-in replace it.

mod cargo;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{CONFIG_FILENAME, DEFAULT_BINARY_NAME};
use crate::platform::os::Os;
use crate::target::{TargetDescriptor, builtin_targets};

pub use cargo::detect_binary_name;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse { path: PathBuf, source: toml::de::Error },

  #[error("invalid target `{target}`: {message}")]
  InvalidTarget { target: String, message: String },

  #[error("target name `{name}` is defined more than once")]
  DuplicateTarget { name: String },
}

/// Contents of `stagehand.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
  /// Binary name used in built-in artifact paths.
  pub binary: Option<String>,
  /// Variables applied to every subprocess.
  #[serde(default)]
  pub env: BTreeMap<String, String>,
  #[serde(default)]
  pub targets: Vec<TargetDescriptor>,
}

impl ProjectConfig {
  /// Parse config text; `path` is only used in error messages.
  pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Load a config file that must exist.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let config = Self::parse(&content, path)?;
    info!(path = %path.display(), targets = config.targets.len(), "loaded config");
    Ok(config)
  }
}

/// A project directory with its configuration resolved.
#[derive(Debug, Clone)]
pub struct Project {
  pub root: PathBuf,
  pub config: ProjectConfig,
  /// Where the config came from, if a file was read.
  pub config_path: Option<PathBuf>,
  pub binary: String,
}

impl Project {
  /// Load the project at `root`.
  ///
  /// An explicit `config` path must exist; otherwise `stagehand.toml` in
  /// the root is read when present and defaults apply when it is not.
  pub fn load(root: &Path, config: Option<&Path>) -> Result<Self, ConfigError> {
    let (config, config_path) = match config {
      Some(path) => (ProjectConfig::load(path)?, Some(path.to_path_buf())),
      None => {
        let default_path = root.join(CONFIG_FILENAME);
        if default_path.is_file() {
          (ProjectConfig::load(&default_path)?, Some(default_path))
        } else {
          debug!(root = %root.display(), "no config file, using defaults");
          (ProjectConfig::default(), None)
        }
      }
    };

    let binary = config
      .binary
      .clone()
      .or_else(|| detect_binary_name(root))
      .unwrap_or_else(|| DEFAULT_BINARY_NAME.to_string());

    Ok(Self {
      root: root.to_path_buf(),
      config,
      config_path,
      binary,
    })
  }

  /// Built-in targets for `host` merged with configured ones.
  pub fn targets(&self, host: Os) -> Result<Vec<TargetDescriptor>, ConfigError> {
    resolve_targets(&self.config, host, &self.binary)
  }
}

/// Merge configured targets over the built-ins and validate the result.
///
/// Order: built-ins first (replaced in place when overridden), then new
/// configured targets in file order.
pub fn resolve_targets(config: &ProjectConfig, host: Os, binary: &str) -> Result<Vec<TargetDescriptor>, ConfigError> {
  let mut targets = builtin_targets(host, binary);

  let mut configured_names = HashSet::new();
  for target in &config.targets {
    validate_target(target)?;
    if !configured_names.insert(target.name.as_str()) {
      return Err(ConfigError::DuplicateTarget {
        name: target.name.clone(),
      });
    }

    match targets.iter_mut().find(|t| t.name == target.name) {
      Some(existing) => {
        debug!(target_name = %target.name, "config overrides built-in target");
        *existing = target.clone();
      }
      None => targets.push(target.clone()),
    }
  }

  let mut seen = HashSet::new();
  for target in &targets {
    for name in std::iter::once(&target.name).chain(&target.aliases) {
      if !seen.insert(name.as_str()) {
        return Err(ConfigError::DuplicateTarget { name: name.clone() });
      }
    }
  }

  Ok(targets)
}

fn validate_target(target: &TargetDescriptor) -> Result<(), ConfigError> {
  let invalid = |message: &str| ConfigError::InvalidTarget {
    target: target.name.clone(),
    message: message.to_string(),
  };

  if target.name.trim().is_empty() {
    return Err(invalid("name must not be empty"));
  }
  if target.build.program.trim().is_empty() {
    return Err(invalid("build program must not be empty"));
  }
  if target.artifact.as_os_str().is_empty() {
    return Err(invalid("artifact path must not be empty"));
  }
  if target.output_dir.as_os_str().is_empty() {
    return Err(invalid("output_dir must not be empty"));
  }
  if target.prerequisites.iter().any(|p| p.name.trim().is_empty()) {
    return Err(invalid("prerequisite names must not be empty"));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::target::Probe;
  use crate::target::builtin::{WASM_TARGET, WINDOWS_TARGET};
  use tempfile::TempDir;

  const LINUX_TARGET: &str = r#"
binary = "spaceflight-elephant"

[env]
RUSTFLAGS = "-C target-cpu=generic"

[[targets]]
name = "linux"
aliases = ["native"]
artifact = "target/release/spaceflight-elephant"
output_dir = "dist/linux"
build = { program = "cargo", args = ["build", "--release"] }

[[targets.prerequisites]]
name = "cargo"
probe = { kind = "executable", name = "cargo" }
guidance = "Install Rust from https://rustup.rs"
"#;

  #[test]
  fn parses_full_config() {
    let config = ProjectConfig::parse(LINUX_TARGET, Path::new("stagehand.toml")).unwrap();

    assert_eq!(config.binary.as_deref(), Some("spaceflight-elephant"));
    assert_eq!(config.env["RUSTFLAGS"], "-C target-cpu=generic");
    let linux = &config.targets[0];
    assert_eq!(linux.build.args, vec!["build", "--release"]);
    assert_eq!(
      linux.prerequisites[0].probe,
      Probe::Executable {
        name: "cargo".to_string()
      }
    );
  }

  #[test]
  fn unknown_keys_are_rejected() {
    let err = ProjectConfig::parse("binray = \"typo\"\n", Path::new("stagehand.toml")).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
  }

  #[test]
  fn configured_targets_extend_builtins() {
    let config = ProjectConfig::parse(LINUX_TARGET, Path::new("stagehand.toml")).unwrap();

    let targets = resolve_targets(&config, Os::Linux, "spaceflight-elephant").unwrap();
    let names: Vec<_> = targets.iter().map(|t| t.name.as_str()).collect();

    assert_eq!(names, vec![WASM_TARGET, WINDOWS_TARGET, "linux"]);
  }

  #[test]
  fn same_name_replaces_builtin() {
    let config = ProjectConfig::parse(
      r#"
[[targets]]
name = "wasm"
artifact = "pkg"
output_dir = "site/pkg"
build = { program = "wasm-pack", args = ["build", "--target", "bundler"] }
"#,
      Path::new("stagehand.toml"),
    )
    .unwrap();

    let targets = resolve_targets(&config, Os::Linux, "app").unwrap();

    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].output_dir, PathBuf::from("site/pkg"));
    assert!(targets[0].prerequisites.is_empty());
  }

  #[test]
  fn alias_clashing_with_builtin_is_rejected() {
    let config = ProjectConfig::parse(
      r#"
[[targets]]
name = "win-msvc"
aliases = ["windows"]
artifact = "a.exe"
output_dir = "out"
build = { program = "cargo" }
"#,
      Path::new("stagehand.toml"),
    )
    .unwrap();

    let err = resolve_targets(&config, Os::Linux, "app").unwrap_err();

    assert!(matches!(err, ConfigError::DuplicateTarget { name } if name == "windows"));
  }

  #[test]
  fn empty_build_program_is_invalid() {
    let config = ProjectConfig::parse(
      r#"
[[targets]]
name = "broken"
artifact = "a"
output_dir = "out"
build = { program = "" }
"#,
      Path::new("stagehand.toml"),
    )
    .unwrap();

    let err = resolve_targets(&config, Os::Linux, "app").unwrap_err();

    assert!(matches!(err, ConfigError::InvalidTarget { .. }));
  }

  #[test]
  fn project_without_config_uses_cargo_binary_name() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
      temp.path().join("Cargo.toml"),
      "[package]\nname = \"spaceflight-elephant\"\nversion = \"0.1.0\"\n",
    )
    .unwrap();

    let project = Project::load(temp.path(), None).unwrap();

    assert_eq!(project.binary, "spaceflight-elephant");
    assert!(project.config_path.is_none());
    let windows = project
      .targets(Os::Linux)
      .unwrap()
      .into_iter()
      .find(|t| t.name == WINDOWS_TARGET)
      .unwrap();
    assert!(windows.artifact.ends_with("spaceflight-elephant.exe"));
  }

  #[test]
  fn project_falls_back_to_default_binary_name() {
    let temp = TempDir::new().unwrap();

    let project = Project::load(temp.path(), None).unwrap();

    assert_eq!(project.binary, DEFAULT_BINARY_NAME);
  }

  #[test]
  fn config_binary_beats_cargo_manifest() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("Cargo.toml"), "[package]\nname = \"game\"\n").unwrap();
    std::fs::write(temp.path().join(CONFIG_FILENAME), "binary = \"elephant\"\n").unwrap();

    let project = Project::load(temp.path(), None).unwrap();

    assert_eq!(project.binary, "elephant");
    assert_eq!(project.config_path, Some(temp.path().join(CONFIG_FILENAME)));
  }

  #[test]
  fn explicit_config_must_exist() {
    let temp = TempDir::new().unwrap();

    let err = Project::load(temp.path(), Some(&temp.path().join("missing.toml"))).unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
  }
}
