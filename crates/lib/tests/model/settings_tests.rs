use buildgraph_lib::build::{Build, BuildError};
use buildgraph_lib::settings::{AuxiliaryRepositories, Repository, Settings, SettingsError, SettingsLifecycle, SettingsState};

use super::common::path;

#[test]
fn mutation_allowed_until_locked() {
  let mut settings = Settings::new("demo");
  let mut lifecycle = SettingsLifecycle::new(AuxiliaryRepositories::none());

  lifecycle.begin_evaluation(&settings).unwrap();
  settings.include(path(":app")).unwrap();
  settings.set_property("group", "org.example").unwrap();
  lifecycle.finish_evaluation(&mut settings).unwrap();

  assert_eq!(lifecycle.state(), SettingsState::Locked);
  assert!(matches!(settings.include(path(":lib")), Err(SettingsError::Locked(_))));
  assert!(matches!(settings.set_property("group", "other"), Err(SettingsError::Locked(_))));
  assert!(matches!(settings.repositories_mut(), Err(SettingsError::Locked(_))));
  assert_eq!(settings.property("group"), Some("org.example"));
}

#[test]
fn locked_settings_cannot_be_evaluated_again() {
  let mut settings = Settings::new("demo");
  SettingsLifecycle::default().run(&mut settings, |_| Ok(())).unwrap();

  let err = SettingsLifecycle::default()
    .run(&mut settings, |s| s.include(path(":late")))
    .unwrap_err();
  assert_eq!(err, SettingsError::AlreadyLocked);
  assert!(!settings.is_included(&path(":late")));
}

#[test]
fn projects_require_locked_settings() {
  let mut settings = Settings::new("demo");
  settings.repositories_mut().unwrap().add(Repository::plugin_portal());
  assert_eq!(Build::new(settings).unwrap_err(), BuildError::SettingsNotLocked);
}
