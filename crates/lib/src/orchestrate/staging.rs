//! Artifact staging: copy what the build produced to its output directory.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::util::fs::{copy_dir_all, is_inside, same_location};

use super::types::BuildError;

/// Stage `artifact` into `output_dir`, both relative to `root`.
///
/// The output directory is created if absent. When the artifact already
/// lives at its destination (a packager writing straight into the output
/// directory) nothing is copied. A staged directory replaces the previous
/// copy as a whole. Returns the final artifact path.
pub fn stage_artifact(target: &str, root: &Path, artifact: &Path, output_dir: &Path) -> Result<PathBuf, BuildError> {
  let source = root.join(artifact);
  if !source.exists() {
    return Err(BuildError::ArtifactMissing {
      target: target.to_string(),
      path: source,
    });
  }

  let out_dir = root.join(output_dir);
  let overlapping = || BuildError::OverlappingOutput {
    target: target.to_string(),
    artifact: source.clone(),
    output: out_dir.clone(),
  };
  if source.is_dir() && is_inside(&out_dir, &source) {
    return Err(overlapping());
  }
  std::fs::create_dir_all(&out_dir).map_err(|source| BuildError::Io {
    path: out_dir.clone(),
    source,
  })?;

  if same_location(&source, &out_dir) {
    debug!(artifact = %source.display(), "artifact already in output directory");
    return Ok(out_dir);
  }

  let Some(file_name) = source.file_name() else {
    return Err(BuildError::Io {
      path: source.clone(),
      source: io::Error::new(io::ErrorKind::InvalidInput, "artifact path has no file name"),
    });
  };
  let dest = out_dir.join(file_name);

  if same_location(&source, &dest) {
    debug!(artifact = %dest.display(), "artifact already staged");
    return Ok(dest);
  }

  if source.is_dir() {
    if is_inside(&source, &dest) {
      return Err(overlapping());
    }
    remove_stale(&dest)?;
    let copied = copy_dir_all(&source, &dest).map_err(|err| BuildError::Io {
      path: dest.clone(),
      source: err,
    })?;
    info!(from = %source.display(), to = %dest.display(), files = copied, "staged artifact directory");
  } else {
    std::fs::copy(&source, &dest).map_err(|err| BuildError::Io {
      path: dest.clone(),
      source: err,
    })?;
    info!(from = %source.display(), to = %dest.display(), "staged artifact");
  }

  Ok(dest)
}

/// Clear a previous copy so files dropped from the artifact do not linger.
fn remove_stale(dest: &Path) -> Result<(), BuildError> {
  let removed = if dest.is_dir() {
    std::fs::remove_dir_all(dest)
  } else if dest.exists() {
    std::fs::remove_file(dest)
  } else {
    return Ok(());
  };
  removed.map_err(|source| BuildError::Io {
    path: dest.to_path_buf(),
    source,
  })?;
  debug!(path = %dest.display(), "removed previous staged copy");
  Ok(())
}
