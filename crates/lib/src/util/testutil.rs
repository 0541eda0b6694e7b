//! Test utilities for stagehand-lib.
//!
//! Cross-platform helpers for tests that need to run shell commands or
//! fake installed tools.

use std::path::{Path, PathBuf};

use crate::target::CommandSpec;

/// Returns a command that runs `script` in the platform shell.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> CommandSpec {
  CommandSpec::new("/bin/sh").args(["-c", script])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> CommandSpec {
  CommandSpec::new("cmd.exe").args(["/C", script])
}

/// Writes an executable script named `name` into `dir` that exits with `code`.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, code: i32) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  std::fs::create_dir_all(dir).unwrap();
  let path = dir.join(name);
  std::fs::write(&path, format!("#!/bin/sh\nexit {}\n", code)).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// Returns a shell script that installs a fake tool into `dir` when run.
#[cfg(unix)]
pub fn install_script(dir: &Path, name: &str) -> String {
  let path = dir.join(name);
  format!(
    "mkdir -p '{dir}' && printf '#!/bin/sh\\nexit 0\\n' > '{path}' && chmod +x '{path}'",
    dir = dir.display(),
    path = path.display()
  )
}
