//! JSON description of a build.
//!
//! The description is what a settings script and the project build scripts
//! would have declared: which projects exist, which plugins they apply, and
//! the configurations, dependencies, and tasks they add on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::configuration::{ConfigurationRole, DependencyRef};
use crate::plugins;
use crate::settings::{Repository, Settings, SettingsError};
use crate::tasks::TaskDependency;
use crate::types::{ParseError, ProjectPath};

#[derive(Debug, Error)]
pub enum DescriptionError {
  #[error("failed to read build description {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid build description: {0}")]
  Json(#[from] serde_json::Error),

  /// A project is described but not included in the settings.
  #[error("project '{0}' is described but not included in settings")]
  UndeclaredProject(ProjectPath),

  #[error("project '{project}' applies unknown plugin '{plugin}'")]
  UnknownPlugin { project: ProjectPath, plugin: String },

  #[error("project '{project}': {source}")]
  InvalidTask {
    project: ProjectPath,
    #[source]
    source: ParseError,
  },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildDescription {
  #[serde(default)]
  pub settings: SettingsDescription,
  #[serde(default)]
  pub projects: BTreeMap<ProjectPath, ProjectDescription>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsDescription {
  #[serde(default = "default_root_name")]
  pub root_name: String,
  #[serde(default)]
  pub include: Vec<ProjectPath>,
  #[serde(default)]
  pub repositories: Vec<Repository>,
  #[serde(default)]
  pub properties: BTreeMap<String, String>,
}

fn default_root_name() -> String {
  "root".to_string()
}

impl Default for SettingsDescription {
  fn default() -> Self {
    Self {
      root_name: default_root_name(),
      include: Vec::new(),
      repositories: Vec::new(),
      properties: BTreeMap::new(),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectDescription {
  #[serde(default)]
  pub plugins: Vec<String>,
  #[serde(default)]
  pub configurations: Vec<ConfigurationDescription>,
  /// Configuration name to declared dependencies.
  #[serde(default)]
  pub dependencies: BTreeMap<String, Vec<DependencyRef>>,
  #[serde(default)]
  pub tasks: Vec<TaskDescription>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationDescription {
  pub name: String,
  /// Role of a new configuration, `legacy` when omitted. A configuration a
  /// plugin already created may be described again only with its own role.
  #[serde(default)]
  pub role: Option<ConfigurationRole>,
  #[serde(default)]
  pub extends: Vec<String>,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskDescription {
  pub name: String,
  /// `name` for a task of the same project, `:path:name` otherwise.
  #[serde(default)]
  pub depends_on: Vec<String>,
  #[serde(default)]
  pub group: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
}

impl TaskDescription {
  pub fn dependencies(&self) -> Result<Vec<TaskDependency>, ParseError> {
    self.depends_on.iter().map(|d| d.parse()).collect()
  }
}

impl BuildDescription {
  pub fn from_file(path: &Path) -> Result<Self, DescriptionError> {
    let content = std::fs::read_to_string(path).map_err(|source| DescriptionError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loaded build description");
    Self::from_str(&content)
  }

  #[allow(clippy::should_implement_trait)]
  pub fn from_str(content: &str) -> Result<Self, DescriptionError> {
    Ok(serde_json::from_str(content)?)
  }

  /// Check what the schema alone cannot.
  pub fn validate(&self) -> Result<(), DescriptionError> {
    for (path, project) in &self.projects {
      if !path.is_root() && !self.settings.include.contains(path) {
        return Err(DescriptionError::UndeclaredProject(path.clone()));
      }
      if let Some(plugin) = project.plugins.iter().find(|p| !plugins::is_known(p)) {
        return Err(DescriptionError::UnknownPlugin {
          project: path.clone(),
          plugin: plugin.clone(),
        });
      }
      for task in &project.tasks {
        task.dependencies().map_err(|source| DescriptionError::InvalidTask {
          project: path.clone(),
          source,
        })?;
      }
    }
    Ok(())
  }

  /// The description of `path`, if it has one.
  pub fn project(&self, path: &ProjectPath) -> Option<&ProjectDescription> {
    self.projects.get(path)
  }
}

impl SettingsDescription {
  /// Replay the declarations onto `settings`.
  pub fn apply(&self, settings: &mut Settings) -> Result<(), SettingsError> {
    for path in &self.include {
      settings.include(path.clone())?;
    }
    let repositories = settings.repositories_mut()?;
    for repository in &self.repositories {
      repositories.add(repository.clone());
    }
    for (key, value) in &self.properties {
      settings.set_property(key, value)?;
    }
    Ok(())
  }
}
