//! Configuration handling through the CLI.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn binary_name_comes_from_cargo_manifest() {
  let env = TestEnv::empty();
  env.write_file(
    "Cargo.toml",
    "[package]\nname = \"spaceflight-elephant\"\nversion = \"0.1.0\"\n",
  );

  env
    .stagehand_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("spaceflight-elephant.exe"));
}

#[test]
fn configured_target_is_listed() {
  let env = TestEnv::with_config(
    r#"
[[targets]]
name = "linux"
aliases = ["native"]
artifact = "target/release/app"
output_dir = "dist/linux"
build = { program = "cargo", args = ["build", "--release"] }
"#,
  );

  env
    .stagehand_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("linux (native)"))
    .stdout(predicate::str::contains("cargo build --release"));
}

#[test]
fn list_json_includes_builtins() {
  let env = TestEnv::empty();

  let output = env.stagehand_cmd().args(["--output", "json", "list"]).output().unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let names: Vec<&str> = json
    .as_array()
    .unwrap()
    .iter()
    .map(|t| t["name"].as_str().unwrap())
    .collect();
  assert_eq!(names, vec!["wasm", "windows-x86_64"]);
}

#[test]
fn unknown_config_key_is_rejected() {
  let env = TestEnv::with_config("binray = \"typo\"\n");

  env
    .stagehand_cmd()
    .arg("list")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load project configuration"));
}

#[test]
fn explicit_config_path_is_used() {
  let env = TestEnv::empty();
  env.write_file("ci/stagehand.toml", "binary = \"from-ci\"\n");

  env
    .stagehand_cmd()
    .arg("--config")
    .arg(env.root().join("ci/stagehand.toml"))
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("from-ci.exe"));
}

#[test]
fn duplicate_alias_is_rejected() {
  let env = TestEnv::with_config(
    r#"
[[targets]]
name = "win-msvc"
aliases = ["windows"]
artifact = "a.exe"
output_dir = "out"
build = { program = "cargo" }
"#,
  );

  env
    .stagehand_cmd()
    .arg("list")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid target configuration"));
}
