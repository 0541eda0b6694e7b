use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

/// Lexically normalize a path: drop `.` components and fold `..` where possible.
pub fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if !out.pop() {
          out.push("..");
        }
      }
      other => out.push(other.as_os_str()),
    }
  }
  out
}

/// Whether two paths name the same location, canonically when both exist.
pub fn same_location(a: &Path, b: &Path) -> bool {
  match (dunce::canonicalize(a), dunce::canonicalize(b)) {
    (Ok(a), Ok(b)) => a == b,
    _ => normalize(a) == normalize(b),
  }
}

/// Resolve `path` as far as it exists on disk, keeping the missing tail.
///
/// Lets paths that do not exist yet be compared with canonical ones.
fn resolve(path: &Path) -> PathBuf {
  let normalized = normalize(path);
  let mut existing = normalized.as_path();
  let mut missing = Vec::new();
  loop {
    if let Ok(canonical) = dunce::canonicalize(existing) {
      return missing.iter().rev().fold(canonical, |acc, part| acc.join(part));
    }
    match (existing.parent(), existing.file_name()) {
      (Some(parent), Some(name)) => {
        missing.push(name.to_os_string());
        existing = parent;
      }
      _ => return normalized,
    }
  }
}

/// Whether `path` lies strictly below `dir`. Neither needs to exist.
pub fn is_inside(path: &Path, dir: &Path) -> bool {
  let path = resolve(path);
  let dir = resolve(dir);
  path != dir && path.starts_with(&dir)
}

/// Recursively copy `src` into `dst`, overwriting files that already exist.
///
/// Returns the number of files copied.
pub fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<usize> {
  let mut copied = 0;
  for entry in WalkDir::new(src).follow_links(true) {
    let entry = entry.map_err(io::Error::other)?;
    let relative = entry
      .path()
      .strip_prefix(src)
      .map_err(io::Error::other)?;
    let target = dst.join(relative);

    if entry.file_type().is_dir() {
      std::fs::create_dir_all(&target)?;
    } else {
      if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
      }
      std::fs::copy(entry.path(), &target)?;
      copied += 1;
    }
  }
  Ok(copied)
}
