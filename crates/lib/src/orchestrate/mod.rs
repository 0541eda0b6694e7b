//! Build orchestration.
//!
//! A run takes one [`TargetDescriptor`] through a fixed, fail-fast pipeline:
//! 1. Environment setup (scoped [`EnvOverlay`])
//! 2. Prerequisite check
//! 3. Installation of missing, auto-installable prerequisites
//! 4. The delegated build command
//! 5. Artifact staging
//!
//! No stage is retried and later stages never run after a failure. The
//! outcome is always a [`BuildResult`].

pub mod staging;
pub mod types;

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::env::EnvOverlay;
use crate::prereq::{self, PrerequisiteCheck, PrerequisiteStatus};
use crate::process::{OutputMode, ProcessError, ProcessOutput, run_command};
use crate::target::{Prerequisite, TargetDescriptor};

pub use staging::stage_artifact;
pub use types::{
  BuildError, BuildResult, BuildStatus, InstallAction, Progress, ProgressEvent, RunContext, Stage, StageFailure,
};

/// Per-prerequisite status for one target, without installing anything.
#[derive(Debug, Clone, Serialize)]
pub struct PrerequisiteReport {
  pub target: String,
  pub checks: Vec<PrerequisiteCheck>,
}

impl PrerequisiteReport {
  /// True when every prerequisite is present or can be installed.
  pub fn is_ready(&self) -> bool {
    self.checks.iter().all(|c| c.status != PrerequisiteStatus::Missing)
  }
}

/// Run one target through the whole pipeline.
pub async fn run_build(descriptor: &TargetDescriptor, ctx: &RunContext, progress: &dyn Progress) -> BuildResult {
  let started = Instant::now();
  let mut installed = Vec::new();

  info!(build_target = %descriptor.name, "starting build run");

  let status = match execute(descriptor, ctx, progress, &mut installed).await {
    Ok(artifact) => {
      info!(build_target = %descriptor.name, artifact = %artifact.display(), "build run succeeded");
      BuildStatus::Succeeded { artifact }
    }
    Err(failure) => {
      error!(build_target = %descriptor.name, stage = %failure.stage, error = %failure.error, "build run failed");
      BuildStatus::Failed(failure)
    }
  };

  BuildResult {
    target: descriptor.name.clone(),
    status,
    installed,
    duration: started.elapsed(),
  }
}

/// Run several targets one after another, stopping after the first failure.
///
/// Targets share the working and output directories, so they never run
/// concurrently.
pub async fn run_targets(descriptors: &[TargetDescriptor], ctx: &RunContext, progress: &dyn Progress) -> Vec<BuildResult> {
  let mut results = Vec::with_capacity(descriptors.len());
  for descriptor in descriptors {
    let result = run_build(descriptor, ctx, progress).await;
    let failed = !result.is_success();
    results.push(result);
    if failed {
      let remaining = descriptors.len() - results.len();
      if remaining > 0 {
        warn!(skipped = remaining, "stopping after failed target");
      }
      break;
    }
  }
  results
}

/// Probe every prerequisite of `descriptor` without installing anything.
pub async fn check_prerequisites(descriptor: &TargetDescriptor, ctx: &RunContext) -> Result<PrerequisiteReport, StageFailure> {
  let overlay = setup_environment(descriptor, ctx).map_err(at(Stage::Environment))?;

  let mut checks = Vec::with_capacity(descriptor.prerequisites.len());
  for prerequisite in &descriptor.prerequisites {
    checks.push(prereq::check(prerequisite, &overlay, &ctx.project_root).await);
  }

  Ok(PrerequisiteReport {
    target: descriptor.name.clone(),
    checks,
  })
}

async fn execute(
  descriptor: &TargetDescriptor,
  ctx: &RunContext,
  progress: &dyn Progress,
  installed: &mut Vec<InstallAction>,
) -> Result<PathBuf, StageFailure> {
  let name = descriptor.name.as_str();

  progress.event(ProgressEvent::StageStarted {
    target: name,
    stage: Stage::Environment,
  });
  let overlay = setup_environment(descriptor, ctx).map_err(at(Stage::Environment))?;

  progress.event(ProgressEvent::StageStarted {
    target: name,
    stage: Stage::PrerequisiteCheck,
  });
  let missing = find_missing(descriptor, ctx, &overlay, progress)
    .await
    .map_err(at(Stage::PrerequisiteCheck))?;

  if !missing.is_empty() {
    progress.event(ProgressEvent::StageStarted {
      target: name,
      stage: Stage::Installation,
    });
    for prerequisite in missing {
      let action = install(name, prerequisite, ctx, &overlay, progress)
        .await
        .map_err(at(Stage::Installation))?;
      installed.push(action);
    }
  }

  progress.event(ProgressEvent::StageStarted {
    target: name,
    stage: Stage::Build,
  });
  build(descriptor, ctx, &overlay, progress).await.map_err(at(Stage::Build))?;

  progress.event(ProgressEvent::StageStarted {
    target: name,
    stage: Stage::Staging,
  });
  let artifact = stage_artifact(name, &ctx.project_root, &descriptor.artifact, &descriptor.output_dir)
    .map_err(at(Stage::Staging))?;
  progress.event(ProgressEvent::Staged {
    target: name,
    artifact: &artifact,
  });

  Ok(artifact)
}

fn at(stage: Stage) -> impl FnOnce(BuildError) -> StageFailure {
  move |error| StageFailure { stage, error }
}

/// Build the overlay for this run. It lives only as long as the run.
fn setup_environment(descriptor: &TargetDescriptor, ctx: &RunContext) -> Result<EnvOverlay, BuildError> {
  if !ctx.project_root.is_dir() {
    return Err(BuildError::Environment {
      message: format!("project directory {} does not exist", ctx.project_root.display()),
    });
  }

  let mut overlay = EnvOverlay::new();
  overlay.vars.extend(ctx.env.iter().map(|(k, v)| (k.clone(), v.clone())));
  for dir in &ctx.path_prefix {
    overlay.prepend_path(dir.clone());
  }
  for dir in &descriptor.path {
    overlay.prepend_path(ctx.project_root.join(dir));
  }

  debug!(vars = overlay.vars.len(), prefix = ?overlay.path_prefix, "environment overlay ready");
  Ok(overlay)
}

/// Missing prerequisites that can be installed, in descriptor order.
///
/// Fails before anything is installed if a missing one has no installer.
async fn find_missing<'a>(
  descriptor: &'a TargetDescriptor,
  ctx: &RunContext,
  overlay: &EnvOverlay,
  progress: &dyn Progress,
) -> Result<Vec<&'a Prerequisite>, BuildError> {
  let mut installable = Vec::new();
  for prerequisite in &descriptor.prerequisites {
    let check = prereq::check(prerequisite, overlay, &ctx.project_root).await;
    match check.status {
      PrerequisiteStatus::Present => progress.event(ProgressEvent::PrerequisitePresent {
        target: &descriptor.name,
        name: &prerequisite.name,
      }),
      PrerequisiteStatus::Installable => installable.push(prerequisite),
      PrerequisiteStatus::Missing => {
        return Err(BuildError::PrerequisiteMissing {
          tool: prerequisite.name.clone(),
          guidance: prerequisite.guidance.clone(),
        });
      }
    }
  }
  Ok(installable)
}

async fn install(
  target: &str,
  prerequisite: &Prerequisite,
  ctx: &RunContext,
  overlay: &EnvOverlay,
  progress: &dyn Progress,
) -> Result<InstallAction, BuildError> {
  let failed = |reason: String| BuildError::InstallationFailed {
    tool: prerequisite.name.clone(),
    reason,
  };

  let Some(installer) = &prerequisite.install else {
    return Err(failed("no installer configured".to_string()));
  };
  let command = installer.to_string();

  progress.event(ProgressEvent::Installing {
    target,
    name: &prerequisite.name,
    command: &command,
  });
  info!(prerequisite = %prerequisite.name, cmd = %command, "installing prerequisite");

  let output = run_command(installer, overlay, &ctx.project_root, ctx.output)
    .await
    .map_err(|err| failed(err.to_string()))?;
  if !output.success() {
    return Err(failed(exit_reason(&command, &output, ctx.output)));
  }

  if !prereq::is_present(&prerequisite.probe, overlay, &ctx.project_root).await {
    return Err(failed(format!(
      "`{}` finished but {} is still not detected",
      command, prerequisite.probe
    )));
  }

  Ok(InstallAction {
    prerequisite: prerequisite.name.clone(),
    command,
  })
}

async fn build(
  descriptor: &TargetDescriptor,
  ctx: &RunContext,
  overlay: &EnvOverlay,
  progress: &dyn Progress,
) -> Result<(), BuildError> {
  let command = descriptor.build.to_string();
  progress.event(ProgressEvent::Building {
    target: &descriptor.name,
    command: &command,
  });

  let output = run_command(&descriptor.build, overlay, &ctx.project_root, ctx.output)
    .await
    .map_err(|err| match err {
      ProcessError::Spawn { program, source } => BuildError::Spawn { program, source },
    })?;

  if !output.success() {
    if ctx.output == OutputMode::Capture && !output.stderr.is_empty() {
      warn!(stderr = %output.stderr_tail(), "build command stderr");
    }
    return Err(BuildError::BuildCommandFailed {
      target: descriptor.name.clone(),
      code: output.code,
    });
  }

  Ok(())
}

fn exit_reason(command: &str, output: &ProcessOutput, mode: OutputMode) -> String {
  let code = match output.code {
    Some(code) => format!("exit code {}", code),
    None => "a signal".to_string(),
  };
  let mut reason = format!("`{}` terminated with {}", command, code);
  if mode == OutputMode::Capture && !output.stderr.trim().is_empty() {
    reason.push('\n');
    reason.push_str(output.stderr_tail());
  }
  reason
}
