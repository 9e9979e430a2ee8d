use thiserror::Error;

use crate::project::ProjectError;
use crate::settings::{AuxiliaryRepositories, SettingsError};
use crate::tasks::TaskError;
use crate::types::ProjectPath;

/// Errors that abort assembling a build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  /// A project path is not part of the build.
  #[error("project '{0}' not found in build")]
  ProjectNotFound(ProjectPath),

  /// Configuring a project failed; the project's registries are discarded.
  #[error("failed to configure project '{path}': {source}")]
  Project {
    path: ProjectPath,
    #[source]
    source: ProjectError,
  },

  /// Projects can only be created once settings are locked.
  #[error("settings must be evaluated and locked before projects are configured")]
  SettingsNotLocked,

  #[error(transparent)]
  Settings(#[from] SettingsError),

  #[error(transparent)]
  Task(#[from] TaskError),

  /// Configuration was cancelled before every project finished.
  #[error("build configuration was cancelled")]
  Cancelled,
}

impl BuildError {
  pub fn project(path: &ProjectPath, source: impl Into<ProjectError>) -> Self {
    BuildError::Project {
      path: path.clone(),
      source: source.into(),
    }
  }
}

/// Options for configuring a build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Configure projects on the rayon pool.
  pub parallel: bool,
  /// Repositories injected when settings finish evaluating.
  pub auxiliary_repositories: AuxiliaryRepositories,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      parallel: true,
      auxiliary_repositories: AuxiliaryRepositories::default(),
    }
  }
}
