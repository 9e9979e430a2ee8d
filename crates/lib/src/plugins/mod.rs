//! Plugins that apply conventions to a project.
//!
//! A plugin is a fixed, ordered list of phases. Each phase takes the typed
//! output of the one before it, so the order a project is wired in is visible
//! in one place instead of being spread across callbacks.

pub mod java;

use tracing::debug;

use crate::project::{Project, ProjectError};

pub use java::{JvmTestSuiteFactory, Phase, PhaseReport};

pub const BASE_PLUGIN: &str = "base";
pub const JAVA_PLUGIN: &str = "java";

/// Whether `id` names a plugin that can be applied.
pub fn is_known(id: &str) -> bool {
  matches!(id, BASE_PLUGIN | JAVA_PLUGIN)
}

/// Apply a plugin by id.
///
/// Applying a plugin that is already applied does nothing and reports no
/// phases.
pub fn apply_plugin(project: &mut Project, id: &str) -> Result<PhaseReport, ProjectError> {
  match id {
    BASE_PLUGIN => java::apply_base(project),
    JAVA_PLUGIN => java::apply(project),
    other => Err(ProjectError::UnknownPlugin(other.to_string())),
  }
  .inspect(|report| debug!(project = %project.path(), plugin = id, phases = report.phases().len(), "applied plugin"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_plugin_rejected() {
    let mut project = Project::new(":app".parse().unwrap());
    assert_eq!(
      apply_plugin(&mut project, "kotlin").unwrap_err(),
      ProjectError::UnknownPlugin("kotlin".to_string())
    );
    assert!(!is_known("kotlin"));
    assert!(is_known("java"));
  }
}
