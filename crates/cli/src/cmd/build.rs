//! Implementation of the `stagehand build` command.

use anyhow::{Result, bail};
use owo_colors::{OwoColorize, Stream};

use stagehand_lib::orchestrate::{Progress, ProgressEvent, run_targets};

use super::{Globals, Session, runtime};
use crate::output::{format_duration, print_error, print_info, print_json, print_success, print_warning, symbols};

/// Prints one line per stage transition.
struct TerminalProgress;

impl Progress for TerminalProgress {
  fn event(&self, event: ProgressEvent<'_>) {
    match event {
      ProgressEvent::StageStarted { target, stage } => {
        print_info(&format!("{}: {}", target.if_supports_color(Stream::Stdout, |s| s.bold()), stage));
      }
      ProgressEvent::PrerequisitePresent { name, .. } => {
        println!(
          "  {} {} found",
          symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
          name
        );
      }
      ProgressEvent::Installing { name, command, .. } => {
        println!(
          "  {} installing {}: {}",
          symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.yellow()),
          name,
          command.if_supports_color(Stream::Stdout, |s| s.cyan())
        );
      }
      ProgressEvent::Building { command, .. } => {
        println!(
          "  {} {}",
          symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
          command.if_supports_color(Stream::Stdout, |s| s.cyan())
        );
      }
      ProgressEvent::Staged { artifact, .. } => {
        println!("  {} {}", symbols::ARROW, artifact.display());
      }
    }
  }
}

/// Execute the build command.
///
/// Runs each selected target through the full pipeline, one after another,
/// stopping at the first failure. Exits non-zero if any target failed.
pub fn cmd_build(globals: &Globals, names: &[String], all: bool) -> Result<()> {
  let session = Session::load(globals)?;
  let selected = if all { session.select(&[])? } else { session.select(names)? };
  // Child output would corrupt the JSON document on stdout.
  let ctx = session.run_context(globals.quiet || globals.output.is_json());

  let rt = runtime()?;
  let results = if globals.output.is_json() {
    rt.block_on(run_targets(&selected, &ctx, &()))
  } else {
    rt.block_on(run_targets(&selected, &ctx, &TerminalProgress))
  };

  if globals.output.is_json() {
    print_json(&results)?;
  } else {
    for result in &results {
      match (result.artifact(), result.failure()) {
        (Some(artifact), _) => print_success(&format!(
          "{} built in {} -> {}",
          result.target,
          format_duration(result.duration),
          artifact.display()
        )),
        (None, Some(failure)) => print_error(&format!("{}: {}", result.target, failure)),
        (None, None) => {}
      }
      for action in &result.installed {
        print_info(&format!("installed {} via `{}`", action.prerequisite, action.command));
      }
    }
  }

  let skipped = selected.len() - results.len();
  if skipped > 0 {
    print_warning(&format!("{} target(s) skipped after failure", skipped));
  }

  if let Some(failed) = results.iter().find(|r| !r.is_success()) {
    bail!("Build failed for target `{}`", failed.target);
  }

  Ok(())
}
