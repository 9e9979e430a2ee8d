//! Per-project task registration.

use std::collections::HashMap;

use tracing::debug;

use super::types::{Task, TaskAction, TaskDependency, TaskError, TaskHandle, TaskId};
use crate::types::ProjectPath;

/// The tasks of one project, in registration order.
#[derive(Debug, Clone)]
pub struct TaskContainer {
  project: ProjectPath,
  tasks: Vec<Task>,
  by_name: HashMap<String, usize>,
}

impl TaskContainer {
  pub fn new(project: &ProjectPath) -> Self {
    Self {
      project: project.clone(),
      tasks: Vec::new(),
      by_name: HashMap::new(),
    }
  }

  /// Register a new task.
  pub fn register(&mut self, name: &str) -> Result<TaskHandle, TaskError> {
    if self.by_name.contains_key(name) {
      return Err(TaskError::Duplicate(name.to_string()));
    }
    self.by_name.insert(name.to_string(), self.tasks.len());
    self.tasks.push(Task::new(name));
    debug!(project = %self.project, task = name, "registered task");
    Ok(self.handle(name))
  }

  /// Register a task unless one with the same name exists.
  pub fn maybe_register(&mut self, name: &str) -> TaskHandle {
    if !self.by_name.contains_key(name) {
      self.by_name.insert(name.to_string(), self.tasks.len());
      self.tasks.push(Task::new(name));
    }
    self.handle(name)
  }

  /// A handle to an existing task.
  pub fn named(&self, name: &str) -> Result<TaskHandle, TaskError> {
    if !self.by_name.contains_key(name) {
      return Err(TaskError::NotFound(name.to_string()));
    }
    Ok(self.handle(name))
  }

  /// Defer `action` until the task graph is configured.
  pub fn configure(&mut self, name: &str, action: TaskAction) -> Result<(), TaskError> {
    self.get_mut(name)?.push_action(action);
    Ok(())
  }

  /// Set the group and description shown when listing tasks.
  pub fn describe(&mut self, name: &str, group: &str, description: &str) -> Result<(), TaskError> {
    let task = self.get_mut(name)?;
    task.group = Some(group.to_string());
    task.description = Some(description.to_string());
    Ok(())
  }

  /// Add an ordering dependency. The target is not checked until realization.
  pub fn depends_on(&mut self, name: &str, dependency: TaskDependency) -> Result<(), TaskError> {
    let project = self.project.clone();
    let task = self.get_mut(name)?;
    if task.push_dependency(dependency.clone()) {
      debug!(
        task = %TaskId::new(&project, name),
        target = %dependency.target(&project),
        "added task dependency"
      );
    }
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&Task> {
    self.by_name.get(name).map(|&idx| &self.tasks[idx])
  }

  pub fn contains(&self, name: &str) -> bool {
    self.by_name.contains_key(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Task> {
    self.tasks.iter()
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  /// Drain deferred actions from every task, keyed by task name.
  pub(crate) fn take_pending(&mut self) -> Vec<(String, Vec<TaskAction>)> {
    self
      .tasks
      .iter_mut()
      .filter(|t| !t.pending_actions().is_empty())
      .map(|t| (t.name().to_string(), t.take_actions()))
      .collect()
  }

  fn get_mut(&mut self, name: &str) -> Result<&mut Task, TaskError> {
    match self.by_name.get(name) {
      Some(&idx) => Ok(&mut self.tasks[idx]),
      None => Err(TaskError::NotFound(name.to_string())),
    }
  }

  fn handle(&self, name: &str) -> TaskHandle {
    TaskHandle::new(TaskId::new(&self.project, name))
  }
}
