//! Targets available without any configuration.

use std::path::PathBuf;

use crate::platform::os::Os;

use super::types::{CommandSpec, Prerequisite, TargetDescriptor};

pub const WASM_TARGET: &str = "wasm";
pub const WINDOWS_TARGET: &str = "windows-x86_64";
pub const WINDOWS_TRIPLE: &str = "x86_64-pc-windows-gnu";
pub const MINGW_LINKER: &str = "x86_64-w64-mingw32-gcc";
pub const WASM_PKG_DIR: &str = "www/pkg";
pub const WINDOWS_OUTPUT_DIR: &str = "windows";

const RUSTUP_SCRIPT: &str = "curl --proto '=https' --tlsv1.2 -sSf https://sh.rustup.rs | sh -s -- -y --no-modify-path";

/// All built-in targets for the given host and project binary name.
pub fn builtin_targets(host: Os, binary: &str) -> Vec<TargetDescriptor> {
  vec![wasm_target(host), windows_target(host, binary)]
}

/// `wasm-pack build --target web --out-dir www/pkg --release`
pub fn wasm_target(host: Os) -> TargetDescriptor {
  TargetDescriptor {
    name: WASM_TARGET.to_string(),
    aliases: vec!["web".to_string()],
    prerequisites: vec![
      cargo_prerequisite(host),
      Prerequisite::executable("wasm-pack")
        .with_installer(CommandSpec::new("cargo").args(["install", "wasm-pack"]))
        .with_guidance("Install wasm-pack with `cargo install wasm-pack`"),
    ],
    build: CommandSpec::new("wasm-pack").args(["build", "--target", "web", "--out-dir", WASM_PKG_DIR, "--release"]),
    artifact: PathBuf::from(WASM_PKG_DIR),
    output_dir: PathBuf::from(WASM_PKG_DIR),
    path: Vec::new(),
  }
}

/// `cargo build --release --target x86_64-pc-windows-gnu`, staged to `windows/`.
pub fn windows_target(host: Os, binary: &str) -> TargetDescriptor {
  let artifact = PathBuf::from("target")
    .join(WINDOWS_TRIPLE)
    .join("release")
    .join(format!("{}.exe", binary));

  TargetDescriptor {
    name: WINDOWS_TARGET.to_string(),
    aliases: vec!["windows".to_string()],
    prerequisites: vec![
      cargo_prerequisite(host),
      Prerequisite::rust_target(WINDOWS_TRIPLE)
        .with_installer(CommandSpec::new("rustup").args(["target", "add", WINDOWS_TRIPLE])),
      Prerequisite::executable(MINGW_LINKER).with_guidance(mingw_guidance(host)),
    ],
    build: CommandSpec::new("cargo").args(["build", "--release", "--target", WINDOWS_TRIPLE]),
    artifact,
    output_dir: PathBuf::from(WINDOWS_OUTPUT_DIR),
    path: Vec::new(),
  }
}

fn cargo_prerequisite(host: Os) -> Prerequisite {
  let prereq = Prerequisite::executable("cargo").with_guidance("Install the Rust toolchain from https://rustup.rs");
  if host.is_unix() {
    prereq.with_installer(CommandSpec::new("sh").args(["-c", RUSTUP_SCRIPT]))
  } else {
    prereq
  }
}

fn mingw_guidance(host: Os) -> String {
  let install = match host {
    Os::Linux => "install MinGW-w64 with your package manager, e.g. `sudo apt install mingw-w64` or `sudo pacman -S mingw-w64-gcc`",
    Os::MacOs => "install MinGW-w64 with `brew install mingw-w64`",
    Os::Windows => "install MinGW-w64 (e.g. via MSYS2: `pacman -S mingw-w64-x86_64-gcc`) and add its bin directory to PATH",
  };
  format!("The {} linker is required to cross-compile for Windows; {}", MINGW_LINKER, install)
}
