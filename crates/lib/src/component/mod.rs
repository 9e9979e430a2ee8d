//! Software components.
//!
//! A component bundles the configurations and output of one publishable unit,
//! such as the main Java library of a project or its test suite. Collaborators
//! that only need one aspect of a component go through the traits in
//! [`capabilities`].

pub mod capabilities;
mod registry;
mod types;

pub use capabilities::{HasBuildTasks, HasCompileDependencies, HasRuntimeClasspath};
pub use registry::{ComponentRegistry, TestSuiteFactory};
pub use types::{
  Classpath, ClasspathEntry, Component, ComponentConfigurations, ComponentError, ResolvedEntry, SourceSetOutput,
};
