//! Identifiers shared across the build model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  /// Project paths are colon-separated and start with `:`.
  #[error("invalid project path '{0}': must start with ':' and contain no empty segments")]
  InvalidProjectPath(String),

  /// Module coordinates take the form `group:name:version`.
  #[error("invalid module coordinates '{0}': expected 'group:name:version'")]
  InvalidCoordinates(String),

  /// Task references are a bare name or `:project:path:name`.
  #[error("invalid task reference '{0}'")]
  InvalidTaskReference(String),
}

/// The path of a project within a build, e.g. `:` for the root or `:libs:core`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectPath(String);

impl ProjectPath {
  /// The root project.
  pub fn root() -> Self {
    ProjectPath(":".to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_root(&self) -> bool {
    self.0 == ":"
  }

  /// Last path segment, or the empty string for the root project.
  pub fn name(&self) -> &str {
    self.0.rsplit(':').next().unwrap_or_default()
  }
}

impl FromStr for ProjectPath {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s == ":" {
      return Ok(ProjectPath::root());
    }
    let valid = s.starts_with(':') && s[1..].split(':').all(|segment| !segment.trim().is_empty());
    if !valid {
      return Err(ParseError::InvalidProjectPath(s.to_string()));
    }
    Ok(ProjectPath(s.to_string()))
  }
}

impl TryFrom<String> for ProjectPath {
  type Error = ParseError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<ProjectPath> for String {
  fn from(path: ProjectPath) -> Self {
    path.0
  }
}

impl fmt::Display for ProjectPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Coordinates of an external module published to a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleCoordinates {
  pub group: String,
  pub name: String,
  pub version: String,
}

impl ModuleCoordinates {
  pub fn new(group: &str, name: &str, version: &str) -> Self {
    Self {
      group: group.to_string(),
      name: name.to_string(),
      version: version.to_string(),
    }
  }
}

impl FromStr for ModuleCoordinates {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let parts: Vec<&str> = s.split(':').collect();
    match parts.as_slice() {
      [group, name, version] if parts.iter().all(|p| !p.trim().is_empty()) => {
        Ok(ModuleCoordinates::new(group, name, version))
      }
      _ => Err(ParseError::InvalidCoordinates(s.to_string())),
    }
  }
}

impl TryFrom<String> for ModuleCoordinates {
  type Error = ParseError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<ModuleCoordinates> for String {
  fn from(coords: ModuleCoordinates) -> Self {
    coords.to_string()
  }
}

impl fmt::Display for ModuleCoordinates {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.group, self.name, self.version)
  }
}
