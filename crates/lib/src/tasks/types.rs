use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::linker::LinkDirection;
use crate::types::{ParseError, ProjectPath};

/// Fully qualified task identity, e.g. `:app:build`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskId {
  pub project: ProjectPath,
  pub name: String,
}

impl TaskId {
  pub fn new(project: &ProjectPath, name: &str) -> Self {
    Self {
      project: project.clone(),
      name: name.to_string(),
    }
  }
}

impl fmt::Display for TaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.project.is_root() {
      write!(f, ":{}", self.name)
    } else {
      write!(f, "{}:{}", self.project, self.name)
    }
  }
}

/// A lazy reference to a task by name. Existence is checked when the task
/// graph is realized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskHandle {
  id: TaskId,
}

impl TaskHandle {
  pub(crate) fn new(id: TaskId) -> Self {
    Self { id }
  }

  pub fn id(&self) -> &TaskId {
    &self.id
  }

  pub fn name(&self) -> &str {
    &self.id.name
  }
}

/// An ordering dependency of one task on another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TaskDependency {
  /// A task of the same project.
  Local { task: String },
  /// A task of another project.
  Project { project: ProjectPath, task: String },
}

impl TaskDependency {
  pub fn local(task: &str) -> Self {
    TaskDependency::Local { task: task.to_string() }
  }

  pub fn project(project: &ProjectPath, task: &str) -> Self {
    TaskDependency::Project {
      project: project.clone(),
      task: task.to_string(),
    }
  }

  /// The task this dependency points at, relative to the owning project.
  pub fn target(&self, owner: &ProjectPath) -> TaskId {
    match self {
      TaskDependency::Local { task } => TaskId::new(owner, task),
      TaskDependency::Project { project, task } => TaskId::new(project, task),
    }
  }
}

/// Parses `name` as a local reference and `:path:name` as a project one.
/// `:name` refers to a task of the root project.
impl FromStr for TaskDependency {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || ParseError::InvalidTaskReference(s.to_string());
    match s.rsplit_once(':') {
      None if !s.trim().is_empty() => Ok(TaskDependency::local(s)),
      None => Err(invalid()),
      Some((_, task)) if task.trim().is_empty() => Err(invalid()),
      Some(("", task)) => Ok(TaskDependency::project(&ProjectPath::root(), task)),
      Some((project, task)) if project.starts_with(':') => {
        let project: ProjectPath = project.parse().map_err(|_| invalid())?;
        Ok(TaskDependency::project(&project, task))
      }
      Some(_) => Err(invalid()),
    }
  }
}

/// Configuration work deferred until the task graph is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
  /// Depend on `other_task` in every project related through `configuration`.
  LinkAcrossProjects {
    configuration: String,
    direction: LinkDirection,
    other_task: String,
  },
}

/// A unit of work registered on a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
  name: String,
  pub description: Option<String>,
  pub group: Option<String>,
  depends_on: Vec<TaskDependency>,
  pending: Vec<TaskAction>,
}

impl Task {
  pub(crate) fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      description: None,
      group: None,
      depends_on: Vec::new(),
      pending: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn dependencies(&self) -> &[TaskDependency] {
    &self.depends_on
  }

  pub fn pending_actions(&self) -> &[TaskAction] {
    &self.pending
  }

  /// Returns false when the dependency was already present.
  pub(crate) fn push_dependency(&mut self, dependency: TaskDependency) -> bool {
    if self.depends_on.contains(&dependency) {
      return false;
    }
    self.depends_on.push(dependency);
    true
  }

  pub(crate) fn push_action(&mut self, action: TaskAction) {
    self.pending.push(action);
  }

  pub(crate) fn take_actions(&mut self) -> Vec<TaskAction> {
    std::mem::take(&mut self.pending)
  }
}

/// Errors raised while registering or realizing tasks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
  /// A task with this name is already registered in the project.
  #[error("task with name '{0}' already exists")]
  Duplicate(String),

  /// No task with this name is registered in the project.
  #[error("task with name '{0}' not found")]
  NotFound(String),

  /// Task dependencies form a cycle.
  #[error("circular dependency between tasks involving '{0}'")]
  CycleDetected(TaskId),
}

/// A cross-project task dependency whose target does not exist.
///
/// Scoped to one edge: reported while realizing the task graph without
/// aborting the remaining edges.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("task '{target}' required by '{source_task}' does not exist")]
pub struct MissingTaskError {
  pub source_task: TaskId,
  pub target: TaskId,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_task_references() {
    assert_eq!("jar".parse::<TaskDependency>().unwrap(), TaskDependency::local("jar"));
    assert_eq!(
      ":build".parse::<TaskDependency>().unwrap(),
      TaskDependency::project(&ProjectPath::root(), "build")
    );
    assert_eq!(
      ":libs:core:jar".parse::<TaskDependency>().unwrap(),
      TaskDependency::project(&":libs:core".parse().unwrap(), "jar")
    );
  }

  #[test]
  fn rejects_malformed_references() {
    for input in ["", ":", ":app:", "app:jar", ":libs::jar"] {
      assert!(input.parse::<TaskDependency>().is_err(), "{input} should be rejected");
    }
  }

  #[test]
  fn missing_task_message_names_both_ends() {
    let err = MissingTaskError {
      source_task: TaskId::new(&":app".parse().unwrap(), "buildNeeded"),
      target: TaskId::new(&":lib".parse().unwrap(), "buildNeeded"),
    };
    assert_eq!(
      err.to_string(),
      "task ':lib:buildNeeded' required by ':app:buildNeeded' does not exist"
    );
  }
}
