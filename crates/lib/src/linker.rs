//! Cross-project task linking.
//!
//! Given a configuration name, finds the projects related to a project
//! through project dependencies declared on that configuration and derives
//! task edges onto a named task in each of them. The computation only reads
//! the configured projects, so the result depends on nothing but the
//! declared dependency graph.

use serde::Serialize;
use tracing::debug;

use crate::build::BuildError;
use crate::project::{ProjectError, Projects};
use crate::tasks::{TaskDependency, TaskId};
use crate::types::ProjectPath;

/// Which side of the dependency graph to link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkDirection {
  /// Projects this project depends on.
  Upstream,
  /// Projects that depend on this project.
  Downstream,
}

/// A derived task dependency of `source` on `target_task` in `target_project`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CrossProjectTaskEdge {
  pub source: TaskId,
  pub target_project: ProjectPath,
  pub target_task: String,
}

impl CrossProjectTaskEdge {
  pub fn dependency(&self) -> TaskDependency {
    TaskDependency::project(&self.target_project, &self.target_task)
  }
}

/// Projects related to `project` through `configuration`.
///
/// Upstream projects come in the order their dependencies resolve; downstream
/// projects in path order. The project itself is never included.
pub fn related_projects(
  projects: &Projects,
  project: &ProjectPath,
  configuration: &str,
  direction: LinkDirection,
) -> Result<Vec<ProjectPath>, BuildError> {
  let owner = projects
    .get(project)
    .ok_or_else(|| BuildError::ProjectNotFound(project.clone()))?;

  let related = match direction {
    LinkDirection::Upstream => {
      let handle = owner
        .configurations
        .get(configuration)
        .map_err(|e| BuildError::project(project, ProjectError::from(e)))?;
      owner
        .configurations
        .collect_dependencies(handle)
        .iter()
        .filter_map(|dep| dep.project())
        .filter(|target| *target != project)
        .cloned()
        .collect()
    }
    LinkDirection::Downstream => {
      // Fail the same way upstream does when the configuration is missing here
      owner
        .configurations
        .get(configuration)
        .map_err(|e| BuildError::project(project, ProjectError::from(e)))?;

      projects
        .values()
        .filter(|other| other.path() != project)
        .filter(|other| {
          other
            .configurations
            .find(configuration)
            .map(|handle| {
              other
                .configurations
                .collect_dependencies(handle)
                .iter()
                .any(|dep| dep.project() == Some(project))
            })
            .unwrap_or(false)
        })
        .map(|other| other.path().clone())
        .collect()
    }
  };

  Ok(related)
}

/// Edges from `task` onto `other_task` in every related project.
///
/// Whether `other_task` exists in a related project is not checked here; a
/// missing target surfaces when the task graph is realized.
pub fn link_across_projects(
  projects: &Projects,
  task: &TaskId,
  configuration: &str,
  direction: LinkDirection,
  other_task: &str,
) -> Result<Vec<CrossProjectTaskEdge>, BuildError> {
  let related = related_projects(projects, &task.project, configuration, direction)?;
  let edges: Vec<CrossProjectTaskEdge> = related
    .into_iter()
    .map(|target_project| CrossProjectTaskEdge {
      source: task.clone(),
      target_project,
      target_task: other_task.to_string(),
    })
    .collect();

  debug!(
    task = %task,
    configuration,
    direction = ?direction,
    edges = edges.len(),
    "linked task across projects"
  );
  Ok(edges)
}
