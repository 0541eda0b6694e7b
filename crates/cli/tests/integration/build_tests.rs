//! Build command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

const DEMO_TARGET: &str = r#"
[[targets]]
name = "demo"
aliases = ["d"]
artifact = "out/demo.txt"
output_dir = "dist"
build = { program = "sh", args = ["-c", "mkdir -p out && echo built > out/demo.txt"] }
"#;

const FAILING_TARGET: &str = r#"
[[targets]]
name = "broken"
artifact = "out/never"
output_dir = "dist"
build = { program = "sh", args = ["-c", "echo compile error >&2; exit 3"] }
"#;

const SILENT_TARGET: &str = r#"
[[targets]]
name = "silent"
artifact = "out/missing.bin"
output_dir = "dist"
build = { program = "sh", args = ["-c", "true"] }
"#;

const MISSING_TOOL_TARGET: &str = r#"
[[targets]]
name = "needs-tool"
artifact = "out/app"
output_dir = "dist"
build = { program = "sh", args = ["-c", "mkdir -p out && touch out/app built-marker"] }

[[targets.prerequisites]]
name = "frobnicator"
probe = { kind = "executable", name = "frobnicator-not-installed" }
guidance = "Install frobnicator with your package manager"
"#;

const INSTALLING_TARGET: &str = r#"
[[targets]]
name = "tooled"
artifact = "out/app"
output_dir = "dist"
path = ["tools"]
build = { program = "sh", args = ["-c", "test -x tools/mytool && mkdir -p out && echo ok > out/app"] }

[[targets.prerequisites]]
name = "mytool"
probe = { kind = "executable", name = "mytool" }
install = { program = "sh", args = ["-c", "mkdir -p tools && echo 'exit 0' > tools/mytool && chmod +x tools/mytool"] }
"#;

#[test]
fn build_stages_artifact() {
  let env = TestEnv::with_config(DEMO_TARGET);

  env
    .stagehand_cmd()
    .args(["build", "demo"])
    .assert()
    .success()
    .stdout(predicate::str::contains("demo built in"));

  assert_eq!(env.read_file("dist/demo.txt"), "built\n");
}

#[test]
fn build_accepts_alias() {
  let env = TestEnv::with_config(DEMO_TARGET);

  env.stagehand_cmd().args(["build", "d"]).assert().success();

  assert!(env.root().join("dist/demo.txt").exists());
}

#[test]
fn build_is_repeatable() {
  let env = TestEnv::with_config(DEMO_TARGET);

  env.stagehand_cmd().args(["build", "demo"]).assert().success();
  env.stagehand_cmd().args(["build", "demo"]).assert().success();

  assert_eq!(env.read_file("dist/demo.txt"), "built\n");
}

#[test]
fn unknown_target_fails() {
  let env = TestEnv::with_config(DEMO_TARGET);

  env
    .stagehand_cmd()
    .args(["build", "playstation"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Unknown target `playstation`"))
    .stderr(predicate::str::contains("demo"));
}

#[test]
fn failing_build_reports_exit_code() {
  let env = TestEnv::with_config(FAILING_TARGET);

  env
    .stagehand_cmd()
    .args(["build", "broken"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("build failed"))
    .stderr(predicate::str::contains("exit code 3"));

  assert!(!env.root().join("dist").exists());
}

#[test]
fn successful_build_without_artifact_fails() {
  let env = TestEnv::with_config(SILENT_TARGET);

  env
    .stagehand_cmd()
    .args(["build", "silent"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("artifact staging failed"))
    .stderr(predicate::str::contains("out/missing.bin"));
}

#[test]
fn missing_prerequisite_stops_before_build() {
  let env = TestEnv::with_config(MISSING_TOOL_TARGET);

  env
    .stagehand_cmd()
    .args(["build", "needs-tool"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("prerequisite check failed"))
    .stderr(predicate::str::contains("Install frobnicator"));

  assert!(!env.root().join("built-marker").exists());
}

#[test]
fn installable_prerequisite_is_installed_then_built() {
  let env = TestEnv::with_config(INSTALLING_TARGET);

  env
    .stagehand_cmd()
    .args(["build", "tooled"])
    .assert()
    .success()
    .stdout(predicate::str::contains("installing mytool"))
    .stdout(predicate::str::contains("installed mytool"));

  assert!(env.root().join("tools/mytool").exists());
  assert_eq!(env.read_file("dist/app"), "ok\n");
}

#[test]
fn multi_target_run_stops_after_first_failure() {
  let env = TestEnv::with_config(&format!("{FAILING_TARGET}\n{DEMO_TARGET}"));

  env
    .stagehand_cmd()
    .args(["build", "broken", "demo"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("1 target(s) skipped"));

  assert!(!env.root().join("out/demo.txt").exists());
}

#[test]
fn json_output_describes_results() {
  let env = TestEnv::with_config(DEMO_TARGET);

  let output = env
    .stagehand_cmd()
    .args(["--quiet", "--output", "json", "build", "demo"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json[0]["target"], "demo");
  assert_eq!(json[0]["status"], "succeeded");
  assert!(json[0]["artifact"].as_str().unwrap().ends_with("demo.txt"));
}

#[test]
fn json_output_stays_parseable_when_build_prints() {
  let env = TestEnv::with_config(
    r#"
[[targets]]
name = "chatty"
artifact = "out/app"
output_dir = "dist"
build = { program = "sh", args = ["-c", "echo compiling; echo warning >&2; mkdir -p out && touch out/app"] }
"#,
  );

  let output = env
    .stagehand_cmd()
    .args(["--output", "json", "build", "chatty"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json[0]["target"], "chatty");
  assert_eq!(json[0]["status"], "succeeded");
}

#[test]
fn json_output_describes_failure_stage() {
  let env = TestEnv::with_config(FAILING_TARGET);

  let output = env
    .stagehand_cmd()
    .args(["--quiet", "--output", "json", "build", "broken"])
    .output()
    .unwrap();

  assert!(!output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json[0]["status"], "failed");
  assert_eq!(json[0]["stage"], "build");
  assert_eq!(json[0]["kind"], "build_command_failed");
}

#[test]
fn config_env_reaches_build_command() {
  let env = TestEnv::with_config(
    r#"
[env]
STAGEHAND_GREETING = "hello from config"

[[targets]]
name = "greet"
artifact = "out/greeting"
output_dir = "dist"
build = { program = "sh", args = ["-c", "mkdir -p out && printf '%s' \"$STAGEHAND_GREETING\" > out/greeting"] }
"#,
  );

  env.stagehand_cmd().args(["build", "greet"]).assert().success();

  assert_eq!(env.read_file("dist/greeting"), "hello from config");
}
