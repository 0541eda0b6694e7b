//! CLI integration tests that run real (shell-scripted) builds.

mod common;

#[cfg(unix)]
mod build_tests;
#[cfg(unix)]
mod check_tests;
mod config_tests;
