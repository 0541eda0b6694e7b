//! External command execution.
//!
//! Every installer, probe and build command goes through [`run_command`],
//! which applies the run's [`EnvOverlay`] and waits for the child to exit.
//! Output is never interpreted here; callers look at the exit status.

use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::consts::STDERR_TAIL_BYTES;
use crate::env::EnvOverlay;
use crate::target::CommandSpec;

/// What happens to a child's stdout and stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
  /// Stream to the terminal as the child writes.
  #[default]
  Inherit,
  /// Collect for diagnostics.
  Capture,
}

#[derive(Debug, Error)]
pub enum ProcessError {
  /// The program could not be started at all.
  #[error("failed to start `{program}`: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },
}

/// Exit status and, in capture mode, the child's output.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
  /// `None` when the child was terminated by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ProcessOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// The last few KiB of stderr, for error messages.
  pub fn stderr_tail(&self) -> &str {
    let trimmed = self.stderr.trim_end();
    if trimmed.len() <= STDERR_TAIL_BYTES {
      return trimmed;
    }
    let mut start = trimmed.len() - STDERR_TAIL_BYTES;
    while !trimmed.is_char_boundary(start) {
      start += 1;
    }
    &trimmed[start..]
  }
}

/// Run `spec` to completion in `cwd` (joined with the command's own cwd).
///
/// The program is resolved against the overlaid search path first so that
/// tools installed earlier in the same run are found.
pub async fn run_command(
  spec: &CommandSpec,
  overlay: &EnvOverlay,
  cwd: &Path,
  output: OutputMode,
) -> Result<ProcessOutput, ProcessError> {
  let working_dir = match &spec.cwd {
    Some(dir) => cwd.join(dir),
    None => cwd.to_path_buf(),
  };

  let program = overlay
    .resolve_executable(&spec.program, &working_dir)
    .unwrap_or_else(|| spec.program.clone().into());

  info!(cmd = %spec, "executing command");
  debug!(program = ?program, working_dir = ?working_dir, "spawning process");

  let mut command = Command::new(&program);
  command.args(&spec.args).current_dir(&working_dir).stdin(Stdio::null());
  overlay.apply(&mut command);
  for (key, value) in &spec.env {
    command.env(key, value);
  }

  let spawn_err = |source: std::io::Error| ProcessError::Spawn {
    program: spec.program.clone(),
    source,
  };

  match output {
    OutputMode::Inherit => {
      let status = command
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(spawn_err)?;
      Ok(ProcessOutput {
        code: status.code(),
        ..Default::default()
      })
    }
    OutputMode::Capture => {
      let out = command.output().await.map_err(spawn_err)?;
      let result = ProcessOutput {
        code: out.status.code(),
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
      };

      if !result.success() && !result.stderr.is_empty() {
        debug!(stderr = %result.stderr_tail(), "command stderr");
      }

      Ok(result)
    }
  }
}
