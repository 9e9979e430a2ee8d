//! Types for configurations and the dependencies declared on them.

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ModuleCoordinates, ProjectPath};

/// How a configuration may be used.
///
/// A configuration used as a classpath must be resolvable, and one published
/// as outgoing "elements" must be consumable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigurationRole {
  /// Resolved into files by the owning project (e.g. `compileClasspath`).
  Resolvable,
  /// Exposed to other projects (e.g. `runtimeElements`).
  Consumable,
  /// Only used to declare dependencies (e.g. `implementation`).
  DeclarableOnly,
  /// Resolvable, consumable, and declarable at once (e.g. `default`).
  Legacy,
}

impl ConfigurationRole {
  pub fn can_be_resolved(self) -> bool {
    matches!(self, ConfigurationRole::Resolvable | ConfigurationRole::Legacy)
  }

  pub fn can_be_consumed(self) -> bool {
    matches!(self, ConfigurationRole::Consumable | ConfigurationRole::Legacy)
  }

  pub fn can_be_declared(self) -> bool {
    matches!(self, ConfigurationRole::DeclarableOnly | ConfigurationRole::Legacy)
  }
}

impl fmt::Display for ConfigurationRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigurationRole::Resolvable => write!(f, "resolvable"),
      ConfigurationRole::Consumable => write!(f, "consumable"),
      ConfigurationRole::DeclarableOnly => write!(f, "declarable-only"),
      ConfigurationRole::Legacy => write!(f, "legacy"),
    }
  }
}

/// A dependency declared on a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyRef {
  /// An external module, resolved from a repository.
  Module(ModuleCoordinates),
  /// Another project of the same build.
  Project(ProjectPath),
}

impl DependencyRef {
  /// The target project, if this is a project dependency.
  pub fn project(&self) -> Option<&ProjectPath> {
    match self {
      DependencyRef::Project(path) => Some(path),
      DependencyRef::Module(_) => None,
    }
  }
}

impl fmt::Display for DependencyRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DependencyRef::Module(coords) => write!(f, "{}", coords),
      DependencyRef::Project(path) => write!(f, "project '{}'", path),
    }
  }
}

/// Handle to a configuration node.
///
/// Only valid for the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigurationHandle(pub(crate) NodeIndex);

/// A named bucket of dependency declarations.
///
/// Inheritance edges are owned by the registry, not by the node itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
  name: String,
  role: ConfigurationRole,
  description: Option<String>,
  dependencies: Vec<DependencyRef>,
}

impl Configuration {
  pub(crate) fn new(name: &str, role: ConfigurationRole) -> Self {
    Self {
      name: name.to_string(),
      role,
      description: None,
      dependencies: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn role(&self) -> ConfigurationRole {
    self.role
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  /// Dependencies declared directly on this configuration, in declaration order.
  pub fn dependencies(&self) -> &[DependencyRef] {
    &self.dependencies
  }

  pub(crate) fn set_description(&mut self, description: &str) {
    self.description = Some(description.to_string());
  }

  /// Returns false when the dependency was already declared.
  pub(crate) fn push_dependency(&mut self, dependency: DependencyRef) -> bool {
    if self.dependencies.contains(&dependency) {
      return false;
    }
    self.dependencies.push(dependency);
    true
  }
}

/// Errors raised by configuration registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
  /// A configuration with this name already exists in the project.
  #[error("configuration with name '{0}' already exists")]
  DuplicateName(String),

  /// No configuration with this name exists in the project.
  #[error("configuration with name '{0}' not found")]
  NotFound(String),

  /// The requested inheritance edge would close a cycle.
  #[error("cannot make '{child}' extend from '{parent}': inheritance cycle detected")]
  CyclicInheritance { child: String, parent: String },

  /// The owning project has been locked.
  #[error("cannot {operation} configuration '{name}': the project is locked")]
  Locked { name: String, operation: &'static str },

  /// The configuration cannot be resolved into a dependency set.
  #[error("configuration '{0}' is not resolvable")]
  NotResolvable(String),

  /// Dependencies cannot be declared on the configuration.
  #[error("dependencies cannot be declared on configuration '{0}'")]
  NotDeclarable(String),
}
