//! Target descriptors: one platform's prerequisites, build command and artifact.
//!
//! Adding a platform is data, not control flow: a [`TargetDescriptor`] fully
//! determines one orchestration run.

pub mod builtin;
pub mod types;

pub use builtin::builtin_targets;
pub use types::{CommandSpec, Prerequisite, Probe, TargetDescriptor};

/// Look up a target by name or alias.
pub fn find_target<'a>(targets: &'a [TargetDescriptor], name: &str) -> Option<&'a TargetDescriptor> {
  targets.iter().find(|t| t.answers_to(name))
}
