use std::path::PathBuf;

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the cargo home directory (`$CARGO_HOME`, else `~/.cargo`)
pub fn cargo_home() -> Option<PathBuf> {
  match std::env::var_os("CARGO_HOME") {
    Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
    _ => home_dir().map(|home| home.join(".cargo")),
  }
}

/// Returns the directory rustup and `cargo install` place binaries in
pub fn cargo_bin_dir() -> Option<PathBuf> {
  cargo_home().map(|dir| dir.join("bin"))
}
