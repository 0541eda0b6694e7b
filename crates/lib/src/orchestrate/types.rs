//! Types for orchestration runs.
//!
//! This module defines the stage tags, error taxonomy, run context and the
//! terminal [`BuildResult`] handed back to callers.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use thiserror::Error;

use crate::process::OutputMode;

/// The ordered stages of one run. A failure is always tagged with one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  Environment,
  PrerequisiteCheck,
  Installation,
  Build,
  Staging,
}

impl Stage {
  pub fn as_str(&self) -> &'static str {
    match self {
      Stage::Environment => "environment setup",
      Stage::PrerequisiteCheck => "prerequisite check",
      Stage::Installation => "installation",
      Stage::Build => "build",
      Stage::Staging => "artifact staging",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Fatal errors of a run. None are recovered locally.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Required tool absent and not auto-installable.
  #[error("prerequisite `{tool}` is not installed and cannot be installed automatically\n{}", .guidance.as_deref().unwrap_or("install it manually and re-run"))]
  PrerequisiteMissing { tool: String, guidance: Option<String> },

  /// An automatic installation failed.
  #[error("failed to install `{tool}`: {reason}")]
  InstallationFailed { tool: String, reason: String },

  /// The delegated build process exited non-zero.
  #[error("build command for `{target}` failed with exit code {}", format_code(.code))]
  BuildCommandFailed { target: String, code: Option<i32> },

  /// The build exited successfully but left no artifact behind.
  #[error("build for `{target}` succeeded but produced no artifact at {}", .path.display())]
  ArtifactMissing { target: String, path: PathBuf },

  /// The output location would sit inside the artifact, or the reverse.
  #[error("output {} for `{target}` overlaps its artifact {}", .output.display(), .artifact.display())]
  OverlappingOutput {
    target: String,
    artifact: PathBuf,
    output: PathBuf,
  },

  /// The run's environment could not be established.
  #[error("invalid build environment: {message}")]
  Environment { message: String },

  /// A build command could not be started.
  #[error("failed to start `{program}`: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// Filesystem failure while staging.
  #[error("i/o error at {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl BuildError {
  /// Stable machine-readable kind.
  pub fn kind(&self) -> &'static str {
    match self {
      BuildError::PrerequisiteMissing { .. } => "prerequisite_missing",
      BuildError::InstallationFailed { .. } => "installation_failed",
      BuildError::BuildCommandFailed { .. } => "build_command_failed",
      BuildError::ArtifactMissing { .. } => "artifact_missing",
      BuildError::OverlappingOutput { .. } => "overlapping_output",
      BuildError::Environment { .. } => "environment",
      BuildError::Spawn { .. } => "spawn",
      BuildError::Io { .. } => "io",
    }
  }
}

fn format_code(code: &Option<i32>) -> String {
  match code {
    Some(code) => code.to_string(),
    None => "none (terminated by signal)".to_string(),
  }
}

/// A failed run: the stage it stopped in and why.
#[derive(Debug)]
pub struct StageFailure {
  pub stage: Stage,
  pub error: BuildError,
}

impl fmt::Display for StageFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} failed: {}", self.stage, self.error)
  }
}

impl Serialize for StageFailure {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("StageFailure", 3)?;
    state.serialize_field("stage", &self.stage)?;
    state.serialize_field("kind", self.error.kind())?;
    state.serialize_field("message", &self.error.to_string())?;
    state.end()
  }
}

/// An automatic installation performed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallAction {
  pub prerequisite: String,
  pub command: String,
}

/// Terminal state of a run. Binary: there is no partial success.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildStatus {
  Succeeded { artifact: PathBuf },
  Failed(StageFailure),
}

/// Outcome of one orchestration run for one target.
#[derive(Debug, Serialize)]
pub struct BuildResult {
  pub target: String,
  #[serde(flatten)]
  pub status: BuildStatus,
  pub installed: Vec<InstallAction>,
  #[serde(serialize_with = "serialize_millis")]
  pub duration: Duration,
}

impl BuildResult {
  pub fn is_success(&self) -> bool {
    matches!(self.status, BuildStatus::Succeeded { .. })
  }

  /// The staged artifact, if the run succeeded.
  pub fn artifact(&self) -> Option<&PathBuf> {
    match &self.status {
      BuildStatus::Succeeded { artifact } => Some(artifact),
      BuildStatus::Failed(_) => None,
    }
  }

  pub fn failure(&self) -> Option<&StageFailure> {
    match &self.status {
      BuildStatus::Succeeded { .. } => None,
      BuildStatus::Failed(failure) => Some(failure),
    }
  }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Inputs shared by every run of one invocation.
#[derive(Debug, Clone)]
pub struct RunContext {
  /// Directory build commands run in; descriptor paths are relative to it.
  pub project_root: PathBuf,
  /// Search-path entries prepended for every target (e.g. `~/.cargo/bin`).
  pub path_prefix: Vec<PathBuf>,
  /// Variables applied to every subprocess.
  pub env: BTreeMap<String, String>,
  /// Output handling for installers and build commands.
  pub output: OutputMode,
}

impl RunContext {
  pub fn new(project_root: impl Into<PathBuf>) -> Self {
    Self {
      project_root: project_root.into(),
      path_prefix: Vec::new(),
      env: BTreeMap::new(),
      output: OutputMode::Inherit,
    }
  }

  pub fn with_path_prefix(mut self, dir: impl Into<PathBuf>) -> Self {
    self.path_prefix.push(dir.into());
    self
  }

  pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
    self.env = env;
    self
  }

  pub fn with_output(mut self, output: OutputMode) -> Self {
    self.output = output;
    self
  }
}

/// Progress notifications emitted while a run advances.
#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent<'a> {
  StageStarted { target: &'a str, stage: Stage },
  PrerequisitePresent { target: &'a str, name: &'a str },
  Installing { target: &'a str, name: &'a str, command: &'a str },
  Building { target: &'a str, command: &'a str },
  Staged { target: &'a str, artifact: &'a std::path::Path },
}

/// Receives progress notifications. `()` ignores them.
pub trait Progress {
  fn event(&self, event: ProgressEvent<'_>);
}

impl Progress for () {
  fn event(&self, _event: ProgressEvent<'_>) {}
}
