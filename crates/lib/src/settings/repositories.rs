//! Artifact repository declarations.

use serde::{Deserialize, Serialize};

pub const PLUGIN_PORTAL_URL: &str = "https://plugins.gradle.org/m2";
pub const KOTLIN_DEV_URL: &str = "https://maven.pkg.jetbrains.space/kotlin/p/kotlin/dev";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryKind {
  Maven,
  PluginPortal,
}

/// A repository artifacts may be resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repository {
  pub name: String,
  pub url: String,
  #[serde(default = "default_kind")]
  pub kind: RepositoryKind,
  /// Regex over module groups; only matching groups are looked up here.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub include_group_pattern: Option<String>,
}

fn default_kind() -> RepositoryKind {
  RepositoryKind::Maven
}

impl Repository {
  pub fn maven(name: &str, url: &str) -> Self {
    Self {
      name: name.to_string(),
      url: url.to_string(),
      kind: RepositoryKind::Maven,
      include_group_pattern: None,
    }
  }

  pub fn plugin_portal() -> Self {
    Self {
      name: "Gradle Central Plugin Repository".to_string(),
      url: PLUGIN_PORTAL_URL.to_string(),
      kind: RepositoryKind::PluginPortal,
      include_group_pattern: None,
    }
  }

  pub fn kotlin_dev() -> Self {
    Self::maven("Kotlin DEV", KOTLIN_DEV_URL).with_group_filter(r"org\.jetbrains\.kotlin.*")
  }

  pub fn with_group_filter(mut self, pattern: &str) -> Self {
    self.include_group_pattern = Some(pattern.to_string());
    self
  }
}

/// An ordered list of repositories. Identical entries are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RepositoryContainer {
  repositories: Vec<Repository>,
}

impl RepositoryContainer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, repository: Repository) {
    self.repositories.push(repository);
  }

  pub fn iter(&self) -> impl Iterator<Item = &Repository> {
    self.repositories.iter()
  }

  pub fn names(&self) -> Vec<&str> {
    self.repositories.iter().map(|r| r.name.as_str()).collect()
  }

  pub fn len(&self) -> usize {
    self.repositories.len()
  }

  pub fn is_empty(&self) -> bool {
    self.repositories.is_empty()
  }
}

/// Repositories injected when settings finish evaluating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryRepositories {
  /// Added to the settings build script repositories.
  pub settings_buildscript: Vec<Repository>,
  /// Added to the settings plugin management repositories.
  pub plugin_management: Vec<Repository>,
  /// Added to each project's build script repositories.
  pub project_buildscript: Vec<Repository>,
  /// Added to each project's repositories.
  pub project: Vec<Repository>,
}

impl Default for AuxiliaryRepositories {
  fn default() -> Self {
    Self {
      settings_buildscript: vec![Repository::kotlin_dev()],
      plugin_management: vec![Repository::kotlin_dev(), Repository::plugin_portal()],
      project_buildscript: vec![Repository::kotlin_dev(), Repository::plugin_portal()],
      project: vec![Repository::kotlin_dev()],
    }
  }
}

impl AuxiliaryRepositories {
  /// Inject nothing.
  pub fn none() -> Self {
    Self {
      settings_buildscript: Vec::new(),
      plugin_management: Vec::new(),
      project_buildscript: Vec::new(),
      project: Vec::new(),
    }
  }
}
