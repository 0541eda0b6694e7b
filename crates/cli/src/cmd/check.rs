//! Implementation of the `stagehand check` command.

use anyhow::{Result, anyhow, bail};
use owo_colors::{OwoColorize, Stream};

use stagehand_lib::orchestrate::check_prerequisites;
use stagehand_lib::prereq::PrerequisiteStatus;

use super::{Globals, Session, runtime};
use crate::output::{print_json, symbols};

/// Execute the check command.
///
/// Probes every prerequisite of the selected targets (all by default) and
/// reports it as present, installable or missing. Nothing is installed.
pub fn cmd_check(globals: &Globals, names: &[String]) -> Result<()> {
  let session = Session::load(globals)?;
  let selected = session.select(names)?;
  let ctx = session.run_context(true);

  let rt = runtime()?;
  let mut reports = Vec::with_capacity(selected.len());
  for target in &selected {
    let report = rt
      .block_on(check_prerequisites(target, &ctx))
      .map_err(|failure| anyhow!("{}: {}", target.name, failure))?;
    reports.push(report);
  }

  if globals.output.is_json() {
    print_json(&reports)?;
  } else {
    for report in &reports {
      println!("{}", report.target.if_supports_color(Stream::Stdout, |s| s.bold()));
      if report.checks.is_empty() {
        println!("  (no prerequisites)");
      }
      for check in &report.checks {
        match check.status {
          PrerequisiteStatus::Present => println!(
            "  {} {}",
            symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
            check.name
          ),
          PrerequisiteStatus::Installable => println!(
            "  {} {} (will be installed)",
            symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.yellow()),
            check.name
          ),
          PrerequisiteStatus::Missing => {
            println!(
              "  {} {} (missing)",
              symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()),
              check.name
            );
            if let Some(guidance) = &check.guidance {
              for line in guidance.lines() {
                println!("      {}", line.if_supports_color(Stream::Stdout, |s| s.dimmed()));
              }
            }
          }
        }
      }
    }
  }

  let blocked: Vec<&str> = reports
    .iter()
    .filter(|r| !r.is_ready())
    .map(|r| r.target.as_str())
    .collect();
  if !blocked.is_empty() {
    bail!("Missing prerequisites for: {}", blocked.join(", "));
  }

  Ok(())
}
