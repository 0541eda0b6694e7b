mod build;
mod check;
mod info;
mod init;
mod list;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::debug;

use stagehand_lib::config::Project;
use stagehand_lib::orchestrate::RunContext;
use stagehand_lib::platform::host_os;
use stagehand_lib::platform::paths::cargo_bin_dir;
use stagehand_lib::process::OutputMode;
use stagehand_lib::target::{TargetDescriptor, find_target};

use crate::output::OutputFormat;

pub use build::cmd_build;
pub use check::cmd_check;
pub use info::cmd_info;
pub use init::cmd_init;
pub use list::cmd_list;

/// Flags shared by every subcommand.
pub struct Globals {
  pub project_dir: PathBuf,
  pub config: Option<PathBuf>,
  pub quiet: bool,
  pub output: OutputFormat,
}

/// A loaded project and the targets it knows about.
struct Session {
  project: Project,
  targets: Vec<TargetDescriptor>,
}

impl Session {
  fn load(globals: &Globals) -> Result<Self> {
    let root = dunce::canonicalize(&globals.project_dir)
      .with_context(|| format!("Project directory not found: {}", globals.project_dir.display()))?;
    let project = Project::load(&root, globals.config.as_deref()).context("Failed to load project configuration")?;
    let targets = project.targets(host_os()).context("Invalid target configuration")?;
    debug!(root = %root.display(), binary = %project.binary, targets = targets.len(), "project loaded");
    Ok(Self { project, targets })
  }

  /// Resolve requested names (or aliases) to descriptors, in request order.
  fn select(&self, names: &[String]) -> Result<Vec<TargetDescriptor>> {
    if names.is_empty() {
      return Ok(self.targets.clone());
    }

    let mut selected: Vec<TargetDescriptor> = Vec::with_capacity(names.len());
    for name in names {
      let Some(target) = find_target(&self.targets, name) else {
        let known: Vec<&str> = self.targets.iter().map(|t| t.name.as_str()).collect();
        bail!("Unknown target `{}` (known targets: {})", name, known.join(", "));
      };
      if !selected.iter().any(|t| t.name == target.name) {
        selected.push(target.clone());
      }
    }
    Ok(selected)
  }

  fn run_context(&self, quiet: bool) -> RunContext {
    let output = if quiet { OutputMode::Capture } else { OutputMode::Inherit };
    let ctx = RunContext::new(&self.project.root)
      .with_env(self.project.config.env.clone())
      .with_output(output);
    match cargo_bin_dir() {
      Some(dir) => ctx.with_path_prefix(dir),
      None => ctx,
    }
  }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")
}
