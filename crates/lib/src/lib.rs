//! stagehand-lib: Core types and logic for stagehand
//!
//! This crate provides the pieces behind the `stagehand` CLI:
//! - `TargetDescriptor`: prerequisites, build command and artifact for one platform
//! - `orchestrate`: the fail-fast run that checks, installs, builds and stages
//! - `BuildResult`: the terminal outcome of a run
//! - `config`: optional `stagehand.toml` project configuration

pub mod config;
pub mod consts;
pub mod env;
pub mod init;
pub mod orchestrate;
pub mod platform;
pub mod prereq;
pub mod process;
pub mod target;
pub mod util;
