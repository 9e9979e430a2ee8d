//! Build settings and their evaluation lifecycle.
//!
//! Settings decide which projects take part in the build and which
//! repositories they start out with. Once evaluation finishes the settings are
//! locked, so every project is configured against the same snapshot.

mod lifecycle;
mod repositories;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::project::Project;
use crate::types::ProjectPath;

pub use lifecycle::{SettingsLifecycle, SettingsListener, SettingsState};
pub use repositories::{
  AuxiliaryRepositories, KOTLIN_DEV_URL, PLUGIN_PORTAL_URL, Repository, RepositoryContainer, RepositoryKind,
};

/// Callback run against every project before it is configured.
pub type ProjectCallback = Arc<dyn Fn(&mut Project) + Send + Sync>;

/// Errors raised by settings operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
  /// The settings were locked and can no longer change.
  #[error("cannot {0}: settings are locked")]
  Locked(&'static str),

  /// The lifecycle already ran to completion for these settings.
  #[error("settings have already been evaluated and locked")]
  AlreadyLocked,

  /// A lifecycle step was invoked out of order.
  #[error("invalid settings transition from {from} to {to}")]
  InvalidTransition { from: SettingsState, to: SettingsState },
}

/// Settings of one build.
pub struct Settings {
  root_name: String,
  includes: Vec<ProjectPath>,
  buildscript_repositories: RepositoryContainer,
  plugin_repositories: RepositoryContainer,
  properties: BTreeMap<String, String>,
  before_project: Vec<ProjectCallback>,
  locked: bool,
}

impl fmt::Debug for Settings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Settings")
      .field("root_name", &self.root_name)
      .field("includes", &self.includes)
      .field("buildscript_repositories", &self.buildscript_repositories)
      .field("plugin_repositories", &self.plugin_repositories)
      .field("properties", &self.properties)
      .field("before_project", &self.before_project.len())
      .field("locked", &self.locked)
      .finish()
  }
}

impl Settings {
  /// Settings that include only the root project.
  pub fn new(root_name: &str) -> Self {
    Self {
      root_name: root_name.to_string(),
      includes: vec![ProjectPath::root()],
      buildscript_repositories: RepositoryContainer::new(),
      plugin_repositories: RepositoryContainer::new(),
      properties: BTreeMap::new(),
      before_project: Vec::new(),
      locked: false,
    }
  }

  pub fn root_name(&self) -> &str {
    &self.root_name
  }

  /// Add a project to the build. Including a project twice is a no-op.
  pub fn include(&mut self, path: ProjectPath) -> Result<(), SettingsError> {
    self.ensure_unlocked("include a project")?;
    if !self.includes.contains(&path) {
      debug!(project = %path, "included project");
      self.includes.push(path);
    }
    Ok(())
  }

  /// Included projects, root first, then in inclusion order.
  pub fn includes(&self) -> &[ProjectPath] {
    &self.includes
  }

  pub fn is_included(&self, path: &ProjectPath) -> bool {
    self.includes.contains(path)
  }

  /// Repositories used to resolve settings and build script plugins.
  pub fn repositories(&self) -> &RepositoryContainer {
    &self.buildscript_repositories
  }

  pub fn repositories_mut(&mut self) -> Result<&mut RepositoryContainer, SettingsError> {
    self.ensure_unlocked("declare a repository")?;
    Ok(&mut self.buildscript_repositories)
  }

  /// Repositories used for plugin resolution.
  pub fn plugin_repositories(&self) -> &RepositoryContainer {
    &self.plugin_repositories
  }

  pub fn plugin_repositories_mut(&mut self) -> Result<&mut RepositoryContainer, SettingsError> {
    self.ensure_unlocked("declare a plugin repository")?;
    Ok(&mut self.plugin_repositories)
  }

  /// Set an extension property.
  pub fn set_property(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
    self.ensure_unlocked("set an extension property")?;
    self.properties.insert(key.to_string(), value.to_string());
    Ok(())
  }

  pub fn property(&self, key: &str) -> Option<&str> {
    self.properties.get(key).map(String::as_str)
  }

  pub fn properties(&self) -> &BTreeMap<String, String> {
    &self.properties
  }

  /// Register a callback run against every project before it is configured.
  pub fn before_each_project(&mut self, callback: ProjectCallback) -> Result<(), SettingsError> {
    self.ensure_unlocked("register a project callback")?;
    self.before_project.push(callback);
    Ok(())
  }

  /// Run the before-each-project callbacks in registration order.
  pub fn apply_before_project(&self, project: &mut Project) {
    for callback in &self.before_project {
      callback(project);
    }
  }

  /// Prevent further mutation.
  pub fn lock(&mut self) {
    self.locked = true;
  }

  pub fn is_locked(&self) -> bool {
    self.locked
  }

  fn ensure_unlocked(&self, operation: &'static str) -> Result<(), SettingsError> {
    if self.locked {
      return Err(SettingsError::Locked(operation));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn path(s: &str) -> ProjectPath {
    s.parse().unwrap()
  }

  #[test]
  fn root_is_always_included() {
    let settings = Settings::new("demo");
    assert_eq!(settings.includes(), &[ProjectPath::root()]);
  }

  #[test]
  fn include_is_idempotent() {
    let mut settings = Settings::new("demo");
    settings.include(path(":app")).unwrap();
    settings.include(path(":app")).unwrap();
    assert_eq!(settings.includes().len(), 2);
  }

  #[test]
  fn mutation_succeeds_before_lock_and_fails_after() {
    let mut settings = Settings::new("demo");
    settings.include(path(":app")).unwrap();
    settings.set_property("version", "1.0").unwrap();
    settings.repositories_mut().unwrap().add(Repository::plugin_portal());

    settings.lock();

    assert_eq!(
      settings.include(path(":lib")).unwrap_err(),
      SettingsError::Locked("include a project")
    );
    assert!(matches!(settings.set_property("k", "v"), Err(SettingsError::Locked(_))));
    assert!(matches!(settings.repositories_mut(), Err(SettingsError::Locked(_))));
    assert!(matches!(settings.plugin_repositories_mut(), Err(SettingsError::Locked(_))));
    assert!(matches!(
      settings.before_each_project(Arc::new(|_: &mut Project| {})),
      Err(SettingsError::Locked(_))
    ));

    assert_eq!(settings.property("version"), Some("1.0"));
    assert_eq!(settings.repositories().len(), 1);
  }

  #[test]
  fn before_project_callbacks_run_in_order() {
    let mut settings = Settings::new("demo");
    settings
      .before_each_project(Arc::new(|p: &mut Project| p.repositories.add(Repository::maven("first", "https://a"))))
      .unwrap();
    settings
      .before_each_project(Arc::new(|p: &mut Project| p.repositories.add(Repository::maven("second", "https://b"))))
      .unwrap();

    let mut project = Project::new(path(":app"));
    settings.apply_before_project(&mut project);
    assert_eq!(project.repositories.names(), vec!["first", "second"]);
  }
}
