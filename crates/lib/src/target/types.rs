use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An external command: program, fixed arguments, extra environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
  pub program: String,
  #[serde(default)]
  pub args: Vec<String>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub env: BTreeMap<String, String>,
  /// Working directory relative to the project root.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cwd: Option<PathBuf>,
}

impl CommandSpec {
  pub fn new(program: &str) -> Self {
    Self {
      program: program.to_string(),
      args: Vec::new(),
      env: BTreeMap::new(),
      cwd: None,
    }
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.args.extend(args.into_iter().map(|a| a.as_ref().to_string()));
    self
  }

  pub fn with_env(mut self, key: &str, value: &str) -> Self {
    self.env.insert(key.to_string(), value.to_string());
    self
  }

  pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
    self.cwd = Some(cwd.into());
    self
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      if arg.contains(char::is_whitespace) {
        write!(f, " \"{}\"", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}

/// How the presence of a prerequisite is detected. Presence only, never versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum Probe {
  /// An executable resolvable on the overlaid search path.
  Executable { name: String },
  /// A rustup target listed by `rustup target list --installed`.
  RustTarget { triple: String },
  /// A query command; exit status zero means present.
  Command {
    program: String,
    #[serde(default)]
    args: Vec<String>,
  },
}

impl fmt::Display for Probe {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Probe::Executable { name } => write!(f, "executable `{}`", name),
      Probe::RustTarget { triple } => write!(f, "rust target `{}`", triple),
      Probe::Command { program, args } => write!(f, "command `{} {}`", program, args.join(" ")),
    }
  }
}

/// An external tool or toolchain component required before building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Prerequisite {
  pub name: String,
  pub probe: Probe,
  /// Automatic installer; `None` means the operator must install it.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub install: Option<CommandSpec>,
  /// Manual installation instructions shown when it cannot be installed.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub guidance: Option<String>,
}

impl Prerequisite {
  pub fn executable(name: &str) -> Self {
    Self {
      name: name.to_string(),
      probe: Probe::Executable { name: name.to_string() },
      install: None,
      guidance: None,
    }
  }

  pub fn rust_target(triple: &str) -> Self {
    Self {
      name: triple.to_string(),
      probe: Probe::RustTarget {
        triple: triple.to_string(),
      },
      install: None,
      guidance: None,
    }
  }

  pub fn with_installer(mut self, install: CommandSpec) -> Self {
    self.install = Some(install);
    self
  }

  pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
    self.guidance = Some(guidance.into());
    self
  }

  pub fn is_installable(&self) -> bool {
    self.install.is_some()
  }
}

/// Everything needed for one build run of one platform.
///
/// Paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDescriptor {
  pub name: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub aliases: Vec<String>,
  #[serde(default)]
  pub prerequisites: Vec<Prerequisite>,
  pub build: CommandSpec,
  /// Where the build command leaves its output.
  pub artifact: PathBuf,
  /// Where the artifact is staged.
  pub output_dir: PathBuf,
  /// Extra search-path entries for this target's subprocesses.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub path: Vec<PathBuf>,
}

impl TargetDescriptor {
  /// Whether `name` refers to this target, by name or alias.
  pub fn answers_to(&self, name: &str) -> bool {
    self.name == name || self.aliases.iter().any(|a| a == name)
  }
}
