//! The one-shot post-evaluation sequence for settings.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::repositories::AuxiliaryRepositories;
use super::{Settings, SettingsError};
use crate::project::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsState {
  Unevaluated,
  Evaluating,
  Evaluated,
  Locked,
}

impl fmt::Display for SettingsState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SettingsState::Unevaluated => write!(f, "unevaluated"),
      SettingsState::Evaluating => write!(f, "evaluating"),
      SettingsState::Evaluated => write!(f, "evaluated"),
      SettingsState::Locked => write!(f, "locked"),
    }
  }
}

/// Notified once settings have been evaluated, before they are locked.
///
/// Listeners may still mutate the settings. An error aborts the sequence and
/// leaves the settings unlocked.
pub type SettingsListener = Box<dyn FnMut(&mut Settings) -> Result<(), SettingsError>>;

/// Drives settings through `Unevaluated -> Evaluating -> Evaluated -> Locked`.
///
/// Finishing evaluation injects the auxiliary repositories, notifies the
/// registered listeners in registration order, and locks the settings.
/// Listeners belong to this instance; nothing is broadcast globally.
pub struct SettingsLifecycle {
  state: SettingsState,
  auxiliary: AuxiliaryRepositories,
  listeners: Vec<SettingsListener>,
}

impl Default for SettingsLifecycle {
  fn default() -> Self {
    Self::new(AuxiliaryRepositories::default())
  }
}

impl SettingsLifecycle {
  pub fn new(auxiliary: AuxiliaryRepositories) -> Self {
    Self {
      state: SettingsState::Unevaluated,
      auxiliary,
      listeners: Vec::new(),
    }
  }

  pub fn state(&self) -> SettingsState {
    self.state
  }

  pub fn add_listener(&mut self, listener: SettingsListener) {
    self.listeners.push(listener);
  }

  /// Enter the `Evaluating` state.
  pub fn begin_evaluation(&mut self, settings: &Settings) -> Result<(), SettingsError> {
    if settings.is_locked() || self.state == SettingsState::Locked {
      return Err(SettingsError::AlreadyLocked);
    }
    self.transition(SettingsState::Unevaluated, SettingsState::Evaluating)
  }

  /// Finish evaluation: inject repositories, fire listeners, lock.
  pub fn finish_evaluation(&mut self, settings: &mut Settings) -> Result<(), SettingsError> {
    if settings.is_locked() || self.state == SettingsState::Locked {
      return Err(SettingsError::AlreadyLocked);
    }
    self.transition(SettingsState::Evaluating, SettingsState::Evaluated)?;

    self.inject_repositories(settings)?;

    debug!(listeners = self.listeners.len(), "firing settings evaluated");
    for listener in self.listeners.iter_mut() {
      listener(settings)?;
    }

    settings.lock();
    self.transition(SettingsState::Evaluated, SettingsState::Locked)?;
    info!(root = settings.root_name(), projects = settings.includes().len(), "settings locked");
    Ok(())
  }

  /// Run the whole sequence around `evaluate`.
  pub fn run<F>(&mut self, settings: &mut Settings, evaluate: F) -> Result<(), SettingsError>
  where
    F: FnOnce(&mut Settings) -> Result<(), SettingsError>,
  {
    self.begin_evaluation(settings)?;
    evaluate(settings)?;
    self.finish_evaluation(settings)
  }

  fn inject_repositories(&self, settings: &mut Settings) -> Result<(), SettingsError> {
    let buildscript = settings.repositories_mut()?;
    for repository in &self.auxiliary.settings_buildscript {
      buildscript.add(repository.clone());
    }

    let plugins = settings.plugin_repositories_mut()?;
    for repository in &self.auxiliary.plugin_management {
      plugins.add(repository.clone());
    }

    let project_buildscript = self.auxiliary.project_buildscript.clone();
    let project_repositories = self.auxiliary.project.clone();
    if !project_buildscript.is_empty() || !project_repositories.is_empty() {
      settings.before_each_project(Arc::new(move |project: &mut Project| {
        for repository in &project_buildscript {
          project.buildscript_repositories.add(repository.clone());
        }
        for repository in &project_repositories {
          project.repositories.add(repository.clone());
        }
      }))?;
    }

    debug!(
      settings = self.auxiliary.settings_buildscript.len() + self.auxiliary.plugin_management.len(),
      per_project = self.auxiliary.project_buildscript.len() + self.auxiliary.project.len(),
      "injected auxiliary repositories"
    );
    Ok(())
  }

  fn transition(&mut self, from: SettingsState, to: SettingsState) -> Result<(), SettingsError> {
    if self.state != from {
      return Err(SettingsError::InvalidTransition { from: self.state, to });
    }
    debug!(from = %from, to = %to, "settings state transition");
    self.state = to;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::rc::Rc;

  use super::*;
  use crate::settings::Repository;
  use crate::types::ProjectPath;

  #[test]
  fn full_sequence_locks_settings() {
    let mut settings = Settings::new("demo");
    let mut lifecycle = SettingsLifecycle::default();

    lifecycle
      .run(&mut settings, |s| s.include(":app".parse().unwrap()))
      .unwrap();

    assert_eq!(lifecycle.state(), SettingsState::Locked);
    assert!(settings.is_locked());
    assert!(settings.include(":lib".parse().unwrap()).is_err());
  }

  #[test]
  fn repositories_injected_into_settings_and_projects() {
    let mut settings = Settings::new("demo");
    let mut lifecycle = SettingsLifecycle::default();
    lifecycle.run(&mut settings, |_| Ok(())).unwrap();

    assert_eq!(settings.repositories().names(), vec!["Kotlin DEV"]);
    assert_eq!(
      settings.plugin_repositories().names(),
      vec!["Kotlin DEV", "Gradle Central Plugin Repository"]
    );

    let mut project = Project::new(ProjectPath::root());
    settings.apply_before_project(&mut project);
    assert_eq!(
      project.buildscript_repositories.names(),
      vec!["Kotlin DEV", "Gradle Central Plugin Repository"]
    );
    assert_eq!(project.repositories.names(), vec!["Kotlin DEV"]);
  }

  #[test]
  fn injected_repositories_follow_declared_ones() {
    let mut settings = Settings::new("demo");
    let mut lifecycle = SettingsLifecycle::default();
    lifecycle
      .run(&mut settings, |s| {
        s.repositories_mut()?.add(Repository::maven("internal", "https://repo.example.com"));
        Ok(())
      })
      .unwrap();

    assert_eq!(settings.repositories().names(), vec!["internal", "Kotlin DEV"]);
  }

  #[test]
  fn listeners_fire_in_registration_order_before_lock() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut lifecycle = SettingsLifecycle::new(AuxiliaryRepositories::none());

    for label in ["first", "second", "third"] {
      let seen = seen.clone();
      lifecycle.add_listener(Box::new(move |settings: &mut Settings| {
        seen.borrow_mut().push((label, settings.is_locked()));
        Ok(())
      }));
    }

    let mut settings = Settings::new("demo");
    lifecycle.run(&mut settings, |_| Ok(())).unwrap();

    assert_eq!(
      *seen.borrow(),
      vec![("first", false), ("second", false), ("third", false)]
    );
  }

  #[test]
  fn listener_changes_are_kept_in_locked_settings() {
    let mut lifecycle = SettingsLifecycle::new(AuxiliaryRepositories::none());
    lifecycle.add_listener(Box::new(|settings: &mut Settings| {
      settings.include(":late".parse().unwrap())?;
      settings
        .repositories_mut()?
        .add(Repository::maven("mirror", "https://mirror.example.com"));
      Ok(())
    }));

    let mut settings = Settings::new("demo");
    lifecycle.run(&mut settings, |_| Ok(())).unwrap();

    assert!(settings.is_locked());
    assert!(settings.is_included(&":late".parse().unwrap()));
    assert_eq!(settings.repositories().names(), vec!["mirror"]);
  }

  #[test]
  fn listener_error_stops_the_sequence() {
    let mut lifecycle = SettingsLifecycle::new(AuxiliaryRepositories::none());
    lifecycle.add_listener(Box::new(|settings: &mut Settings| {
      settings.lock();
      settings.include(":late".parse().unwrap())
    }));
    lifecycle.add_listener(Box::new(|_: &mut Settings| panic!("later listeners must not run")));

    let mut settings = Settings::new("demo");
    let err = lifecycle.run(&mut settings, |_| Ok(())).unwrap_err();

    assert!(matches!(err, SettingsError::Locked(_)));
    assert_eq!(lifecycle.state(), SettingsState::Evaluated);
  }

  #[test]
  fn second_run_fails_with_already_locked() {
    let mut settings = Settings::new("demo");
    let mut lifecycle = SettingsLifecycle::default();
    lifecycle.run(&mut settings, |_| Ok(())).unwrap();

    assert_eq!(
      lifecycle.run(&mut settings, |_| Ok(())).unwrap_err(),
      SettingsError::AlreadyLocked
    );

    let mut fresh = SettingsLifecycle::default();
    assert_eq!(
      fresh.begin_evaluation(&settings).unwrap_err(),
      SettingsError::AlreadyLocked
    );
    assert_eq!(settings.repositories().len(), 1);
  }

  #[test]
  fn finish_without_begin_is_invalid() {
    let mut settings = Settings::new("demo");
    let mut lifecycle = SettingsLifecycle::default();

    assert_eq!(
      lifecycle.finish_evaluation(&mut settings).unwrap_err(),
      SettingsError::InvalidTransition {
        from: SettingsState::Unevaluated,
        to: SettingsState::Evaluated
      }
    );
    assert!(!settings.is_locked());
  }
}
