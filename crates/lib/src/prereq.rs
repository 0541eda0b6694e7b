//! Prerequisite probing.
//!
//! Probes answer one question: is the capability there? They are
//! presence-only and best-effort. A probe that cannot run (e.g. rustup itself
//! is missing) reports the prerequisite as absent rather than failing.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::env::EnvOverlay;
use crate::process::{OutputMode, run_command};
use crate::target::{CommandSpec, Prerequisite, Probe};

/// Outcome of probing one prerequisite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrerequisiteStatus {
  Present,
  /// Absent, but has an automatic installer.
  Installable,
  /// Absent and must be installed by the operator.
  Missing,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrerequisiteCheck {
  pub name: String,
  pub status: PrerequisiteStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub guidance: Option<String>,
}

/// Probe `prereq` and classify it.
pub async fn check(prereq: &Prerequisite, overlay: &EnvOverlay, cwd: &Path) -> PrerequisiteCheck {
  let status = if is_present(&prereq.probe, overlay, cwd).await {
    PrerequisiteStatus::Present
  } else if prereq.is_installable() {
    PrerequisiteStatus::Installable
  } else {
    PrerequisiteStatus::Missing
  };

  debug!(prerequisite = %prereq.name, status = ?status, "probed prerequisite");

  PrerequisiteCheck {
    name: prereq.name.clone(),
    status,
    guidance: prereq.guidance.clone(),
  }
}

/// Whether the capability described by `probe` is available.
pub async fn is_present(probe: &Probe, overlay: &EnvOverlay, cwd: &Path) -> bool {
  match probe {
    Probe::Executable { name } => overlay.resolve_executable(name, cwd).is_some(),
    Probe::RustTarget { triple } => {
      let spec = CommandSpec::new("rustup").args(["target", "list", "--installed"]);
      match run_command(&spec, overlay, cwd, OutputMode::Capture).await {
        Ok(out) if out.success() => installed_targets(&out.stdout).any(|t| t == triple.as_str()),
        Ok(out) => {
          debug!(code = ?out.code, "rustup target list failed");
          false
        }
        Err(err) => {
          debug!(error = %err, "rustup unavailable");
          false
        }
      }
    }
    Probe::Command { program, args } => {
      let spec = CommandSpec::new(program).args(args);
      matches!(
        run_command(&spec, overlay, cwd, OutputMode::Capture).await,
        Ok(out) if out.success()
      )
    }
  }
}

/// Target triples from `rustup target list --installed` output.
///
/// One triple per line. Lines with anything but a single token (warnings,
/// banners) are ignored.
pub fn installed_targets(stdout: &str) -> impl Iterator<Item = &str> {
  stdout.lines().filter_map(|line| {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
      (Some(triple), None) => Some(triple),
      _ => None,
    }
  })
}
