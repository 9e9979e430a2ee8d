//! Narrow views of a component for collaborators that only need one aspect.

use super::types::{Classpath, Component};
use crate::consts::BUILD_TASK;
use crate::configuration::ConfigurationHandle;

pub trait HasRuntimeClasspath {
  fn runtime_classpath(&self) -> &Classpath;
}

pub trait HasCompileDependencies {
  /// The resolvable configuration holding compile-time dependencies.
  fn compile_dependencies(&self) -> ConfigurationHandle;
}

pub trait HasBuildTasks {
  /// Tasks that build this component and everything it needs.
  fn build_tasks(&self) -> Vec<&'static str>;
}

impl HasRuntimeClasspath for Component {
  fn runtime_classpath(&self) -> &Classpath {
    &self.runtime_classpath
  }
}

impl HasCompileDependencies for Component {
  fn compile_dependencies(&self) -> ConfigurationHandle {
    self.configurations.compile_classpath
  }
}

impl HasBuildTasks for Component {
  fn build_tasks(&self) -> Vec<&'static str> {
    vec![BUILD_TASK]
  }
}
