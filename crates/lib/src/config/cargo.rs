//! Binary name detection from the project's `Cargo.toml`.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CargoManifest {
  package: Option<Package>,
  #[serde(default)]
  bin: Vec<BinTarget>,
}

#[derive(Debug, Deserialize)]
struct Package {
  name: String,
}

#[derive(Debug, Deserialize)]
struct BinTarget {
  name: Option<String>,
}

/// The binary a `cargo build` of the project produces.
///
/// First `[[bin]]` with a name, else `[package].name`. `None` when there is
/// no readable manifest.
pub fn detect_binary_name(root: &Path) -> Option<String> {
  let path = root.join("Cargo.toml");
  let content = std::fs::read_to_string(&path).ok()?;
  let manifest: CargoManifest = match toml::from_str(&content) {
    Ok(manifest) => manifest,
    Err(err) => {
      debug!(path = %path.display(), error = %err, "could not parse Cargo.toml");
      return None;
    }
  };

  manifest
    .bin
    .into_iter()
    .find_map(|bin| bin.name)
    .or(manifest.package.map(|p| p.name))
}
