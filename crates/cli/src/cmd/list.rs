//! Implementation of the `stagehand list` command.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use super::{Globals, Session};
use crate::output::{print_json, print_stat};

/// Execute the list command.
///
/// Prints every known target (built-in and configured) with its aliases,
/// build command, artifact and output directory.
pub fn cmd_list(globals: &Globals) -> Result<()> {
  let session = Session::load(globals)?;

  if globals.output.is_json() {
    return print_json(&session.targets);
  }

  for (i, target) in session.targets.iter().enumerate() {
    if i > 0 {
      println!();
    }
    if target.aliases.is_empty() {
      println!("{}", target.name.if_supports_color(Stream::Stdout, |s| s.bold()));
    } else {
      println!(
        "{} ({})",
        target.name.if_supports_color(Stream::Stdout, |s| s.bold()),
        target.aliases.join(", ")
      );
    }
    print_stat("build", &target.build.to_string());
    print_stat("artifact", &target.artifact.display().to_string());
    print_stat("output", &target.output_dir.display().to_string());
    if !target.prerequisites.is_empty() {
      let names: Vec<&str> = target.prerequisites.iter().map(|p| p.name.as_str()).collect();
      print_stat("requires", &names.join(", "));
    }
  }

  Ok(())
}
