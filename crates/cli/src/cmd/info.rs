use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use stagehand_lib::consts::{APP_NAME, CONFIG_FILENAME};
use stagehand_lib::platform::paths::{cargo_bin_dir, cargo_home};
use stagehand_lib::platform::os::Os;
use stagehand_lib::platform::{Platform, host_os};

use super::Globals;
use crate::output::{print_json, print_stat};

#[derive(Serialize)]
struct InfoReport {
  version: &'static str,
  platform: Option<Platform>,
  os: Os,
  exe_suffix: &'static str,
  cargo_home: Option<PathBuf>,
  cargo_bin: Option<PathBuf>,
  project_dir: PathBuf,
  config: Option<PathBuf>,
}

pub fn cmd_info(globals: &Globals) -> Result<()> {
  let os = host_os();
  let config_path = globals
    .config
    .clone()
    .unwrap_or_else(|| globals.project_dir.join(CONFIG_FILENAME));
  let config = config_path.is_file().then_some(config_path);

  let report = InfoReport {
    version: env!("CARGO_PKG_VERSION"),
    platform: Platform::current(),
    os,
    exe_suffix: os.exe_suffix(),
    cargo_home: cargo_home(),
    cargo_bin: cargo_bin_dir(),
    project_dir: dunce::canonicalize(&globals.project_dir).unwrap_or_else(|_| globals.project_dir.clone()),
    config,
  };

  if globals.output.is_json() {
    return print_json(&report);
  }

  let unknown = || "unknown".to_string();
  let shown = |path: &Option<PathBuf>| path.as_ref().map(|p| p.display().to_string());

  println!("{} {}", APP_NAME, report.version);
  print_stat("Platform", &report.platform.map(|p| p.triple()).unwrap_or_else(unknown));
  print_stat("OS", report.os.as_str());
  print_stat("Cargo home", &shown(&report.cargo_home).unwrap_or_else(unknown));
  print_stat("Cargo bin", &shown(&report.cargo_bin).unwrap_or_else(unknown));
  print_stat("Project", &report.project_dir.display().to_string());
  print_stat("Config", &shown(&report.config).unwrap_or_else(|| "(none)".to_string()));

  Ok(())
}
