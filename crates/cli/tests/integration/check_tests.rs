//! Check command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

const CHECKED_TARGET: &str = r#"
[[targets]]
name = "checked"
artifact = "out/app"
output_dir = "dist"
build = { program = "sh", args = ["-c", "true"] }

[[targets.prerequisites]]
name = "shell"
probe = { kind = "executable", name = "sh" }

[[targets.prerequisites]]
name = "mytool"
probe = { kind = "executable", name = "mytool" }
install = { program = "sh", args = ["-c", "touch installed-marker"] }
"#;

const BLOCKED_TARGET: &str = r#"
[[targets]]
name = "blocked"
artifact = "out/app"
output_dir = "dist"
build = { program = "sh", args = ["-c", "true"] }

[[targets.prerequisites]]
name = "frobnicator"
probe = { kind = "command", program = "sh", args = ["-c", "exit 1"] }
guidance = "Install frobnicator with your package manager"
"#;

#[test]
fn check_reports_without_installing() {
  let env = TestEnv::with_config(CHECKED_TARGET);

  env
    .stagehand_cmd()
    .args(["check", "checked"])
    .assert()
    .success()
    .stdout(predicate::str::contains("shell"))
    .stdout(predicate::str::contains("mytool (will be installed)"));

  assert!(!env.root().join("installed-marker").exists());
}

#[test]
fn check_fails_on_missing_prerequisite() {
  let env = TestEnv::with_config(BLOCKED_TARGET);

  env
    .stagehand_cmd()
    .args(["check", "blocked"])
    .assert()
    .failure()
    .stdout(predicate::str::contains("frobnicator (missing)"))
    .stdout(predicate::str::contains("Install frobnicator"))
    .stderr(predicate::str::contains("Missing prerequisites for: blocked"));
}

#[test]
fn check_json_lists_statuses() {
  let env = TestEnv::with_config(CHECKED_TARGET);

  let output = env
    .stagehand_cmd()
    .args(["--output", "json", "check", "checked"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json[0]["target"], "checked");
  assert_eq!(json[0]["checks"][0]["status"], "present");
  assert_eq!(json[0]["checks"][1]["status"], "installable");
}
