//! A project and the registries it owns.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use thiserror::Error;

use crate::component::{ComponentError, ComponentRegistry};
use crate::configuration::{ConfigurationError, ConfigurationRegistry};
use crate::settings::RepositoryContainer;
use crate::tasks::{TaskContainer, TaskError};
use crate::types::ProjectPath;

/// Every project of a build, keyed by path.
pub type Projects = BTreeMap<ProjectPath, Project>;

/// Errors that abort the configuration of one project.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
  #[error(transparent)]
  Configuration(#[from] ConfigurationError),

  #[error(transparent)]
  Component(#[from] ComponentError),

  #[error(transparent)]
  Task(#[from] TaskError),

  /// No plugin is registered under this id.
  #[error("plugin with id '{0}' not found")]
  UnknownPlugin(String),
}

/// A project of the build.
///
/// Registries are owned exclusively by the project; other projects only read
/// them through the linker once configuration is done.
#[derive(Debug)]
pub struct Project {
  path: ProjectPath,
  project_dir: PathBuf,
  applied_plugins: BTreeSet<String>,
  pub configurations: ConfigurationRegistry,
  pub components: ComponentRegistry,
  pub tasks: TaskContainer,
  pub repositories: RepositoryContainer,
  pub buildscript_repositories: RepositoryContainer,
}

impl Project {
  pub fn new(path: ProjectPath) -> Self {
    let project_dir = path
      .as_str()
      .split(':')
      .filter(|segment| !segment.is_empty())
      .fold(PathBuf::from("."), |dir, segment| dir.join(segment));
    Self {
      tasks: TaskContainer::new(&path),
      path,
      project_dir,
      applied_plugins: BTreeSet::new(),
      configurations: ConfigurationRegistry::new(),
      components: ComponentRegistry::new(),
      repositories: RepositoryContainer::new(),
      buildscript_repositories: RepositoryContainer::new(),
    }
  }

  pub fn path(&self) -> &ProjectPath {
    &self.path
  }

  /// Directory of the project relative to the build root.
  pub fn project_dir(&self) -> &PathBuf {
    &self.project_dir
  }

  pub fn has_plugin(&self, id: &str) -> bool {
    self.applied_plugins.contains(id)
  }

  pub fn applied_plugins(&self) -> impl Iterator<Item = &str> {
    self.applied_plugins.iter().map(String::as_str)
  }

  /// Record a plugin as applied. Returns false if it already was.
  pub(crate) fn mark_plugin_applied(&mut self, id: &str) -> bool {
    self.applied_plugins.insert(id.to_string())
  }

  /// Lock the project's configurations against further mutation.
  pub fn lock(&mut self) {
    self.configurations.lock();
  }
}
