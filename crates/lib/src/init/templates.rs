//! Template content for `stagehand init`.

/// Commented starter `stagehand.toml`. `{binary}` is substituted.
pub const CONFIG_TEMPLATE: &str = r#"# stagehand configuration
#
# Built-in targets need no configuration:
#   wasm (web)                wasm-pack build --target web --out-dir www/pkg --release
#   windows-x86_64 (windows)  cargo build --release --target x86_64-pc-windows-gnu
#
# `stagehand list` shows every target, `stagehand check` shows what is
# missing, `stagehand build <target>` builds.

# Binary name for the Windows artifact (target/<triple>/release/<binary>.exe).
binary = "{binary}"

# Extra environment for every installer and build command.
[env]
# RUSTFLAGS = "-C target-cpu=generic"

# Custom targets. A target named like a built-in replaces it.
#
# [[targets]]
# name = "linux"
# aliases = ["native"]
# artifact = "target/release/{binary}"
# output_dir = "dist/linux"
# build = { program = "cargo", args = ["build", "--release"] }
#
# [[targets.prerequisites]]
# name = "cargo"
# probe = { kind = "executable", name = "cargo" }
# guidance = "Install the Rust toolchain from https://rustup.rs"
"#;
