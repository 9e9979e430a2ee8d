use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::configuration::{ConfigurationError, ConfigurationHandle, ConfigurationRegistry, DependencyRef};

/// Output directories of a component's compiled sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSetOutput {
  pub classes_dir: PathBuf,
  pub resources_dir: PathBuf,
}

impl SourceSetOutput {
  /// Conventional layout under `<project_dir>/build`.
  pub fn conventional(project_dir: &Path, source_set: &str) -> Self {
    let build_dir = project_dir.join("build");
    Self {
      classes_dir: build_dir.join("classes").join("java").join(source_set),
      resources_dir: build_dir.join("resources").join(source_set),
    }
  }

  pub fn dirs(&self) -> [&Path; 2] {
    [&self.classes_dir, &self.resources_dir]
  }
}

/// The configurations a component is built from.
///
/// Secondary components such as the test suite have no published API, so
/// the `api*` and `*Elements` slots are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentConfigurations {
  pub implementation: ConfigurationHandle,
  pub compile_only: ConfigurationHandle,
  pub runtime_only: ConfigurationHandle,
  pub compile_classpath: ConfigurationHandle,
  pub runtime_classpath: ConfigurationHandle,
  pub annotation_processor: ConfigurationHandle,
  pub api: Option<ConfigurationHandle>,
  pub compile_only_api: Option<ConfigurationHandle>,
  pub api_elements: Option<ConfigurationHandle>,
  pub runtime_elements: Option<ConfigurationHandle>,
}

/// One element of a classpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEntry {
  /// A directory of compiled output.
  Directory(PathBuf),
  /// The resolved contents of a configuration.
  Configuration(ConfigurationHandle),
}

/// A resolved classpath element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEntry {
  Directory(PathBuf),
  Dependency(DependencyRef),
}

/// An ordered classpath. Earlier entries shadow later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
  entries: Vec<ClasspathEntry>,
}

impl Classpath {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_output(mut self, output: &SourceSetOutput) -> Self {
    for dir in output.dirs() {
      self.entries.push(ClasspathEntry::Directory(dir.to_path_buf()));
    }
    self
  }

  pub fn with_configuration(mut self, configuration: ConfigurationHandle) -> Self {
    self.entries.push(ClasspathEntry::Configuration(configuration));
    self
  }

  pub fn entries(&self) -> &[ClasspathEntry] {
    &self.entries
  }

  /// Expand configuration entries into their transitive dependency sets,
  /// keeping entry order.
  pub fn resolve(&self, configurations: &ConfigurationRegistry) -> Result<Vec<ResolvedEntry>, ConfigurationError> {
    let mut resolved = Vec::new();
    for entry in &self.entries {
      match entry {
        ClasspathEntry::Directory(dir) => resolved.push(ResolvedEntry::Directory(dir.clone())),
        ClasspathEntry::Configuration(handle) => {
          for dependency in configurations.resolve_transitive_dependency_set(*handle)? {
            resolved.push(ResolvedEntry::Dependency(dependency));
          }
        }
      }
    }
    Ok(resolved)
  }
}

/// A publishable unit: sources, configurations, and classpaths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
  name: String,
  source_set: String,
  pub output: SourceSetOutput,
  pub configurations: ComponentConfigurations,
  pub compile_classpath: Classpath,
  pub runtime_classpath: Classpath,
}

impl Component {
  /// A component whose classpaths are its own resolvable configurations,
  /// with its output ahead of the runtime classpath.
  pub fn new(name: &str, source_set: &str, output: SourceSetOutput, configurations: ComponentConfigurations) -> Self {
    let compile_classpath = Classpath::new().with_configuration(configurations.compile_classpath);
    let runtime_classpath = Classpath::new()
      .with_output(&output)
      .with_configuration(configurations.runtime_classpath);
    Self {
      name: name.to_string(),
      source_set: source_set.to_string(),
      output,
      configurations,
      compile_classpath,
      runtime_classpath,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn source_set(&self) -> &str {
    &self.source_set
  }
}

/// Errors raised by component registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
  /// The project already has a main component.
  #[error("cannot register '{attempted}' as main component: '{existing}' is already registered")]
  DuplicateMainComponent { existing: String, attempted: String },

  /// A component with this name already exists.
  #[error("component with name '{0}' already exists")]
  DuplicateName(String),

  /// No component with this name exists.
  #[error("component with name '{0}' not found")]
  NotFound(String),

  /// A test component was requested before the main component exists.
  #[error("cannot wire a test component: the main component must be registered first")]
  MainComponentMissing,

  /// The component has no runtime elements to publish.
  #[error("component '{0}' has no runtime elements configuration")]
  NotPublishable(String),

  #[error(transparent)]
  Configuration(#[from] ConfigurationError),
}
