//! Per-project registry of software components.

use tracing::{debug, info};

use super::types::{Classpath, Component, ComponentError};
use crate::configuration::ConfigurationRegistry;

/// Builds the secondary component of a test suite.
///
/// The factory creates the suite's own configurations; the registry then
/// wires them onto the main component.
pub trait TestSuiteFactory {
  fn create(&self, configurations: &mut ConfigurationRegistry) -> Result<Component, ComponentError>;
}

impl<F> TestSuiteFactory for F
where
  F: Fn(&mut ConfigurationRegistry) -> Result<Component, ComponentError>,
{
  fn create(&self, configurations: &mut ConfigurationRegistry) -> Result<Component, ComponentError> {
    self(configurations)
  }
}

/// Named components of a single project.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
  components: Vec<Component>,
  main: Option<usize>,
}

impl ComponentRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a component without making it the main one.
  pub fn add(&mut self, component: Component) -> Result<(), ComponentError> {
    if self.get(component.name()).is_some() {
      return Err(ComponentError::DuplicateName(component.name().to_string()));
    }
    debug!(component = component.name(), "added component");
    self.components.push(component);
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&Component> {
    self.components.iter().find(|c| c.name() == name)
  }

  pub fn main(&self) -> Option<&Component> {
    self.main.map(|idx| &self.components[idx])
  }

  pub fn iter(&self) -> impl Iterator<Item = &Component> {
    self.components.iter()
  }

  pub fn len(&self) -> usize {
    self.components.len()
  }

  pub fn is_empty(&self) -> bool {
    self.components.is_empty()
  }

  /// Make an added component the project's main component.
  ///
  /// The project's `default_configuration` is made to extend the component's
  /// runtime elements, so consumers of the project see the component's
  /// runtime artifacts. The first registration stays in effect if this fails.
  ///
  /// # Errors
  ///
  /// `DuplicateMainComponent` on a second call, `NotFound` for an unknown
  /// component, `NotPublishable` if it has no runtime elements.
  pub fn register_main(
    &mut self,
    name: &str,
    default_configuration: &str,
    configurations: &mut ConfigurationRegistry,
  ) -> Result<(), ComponentError> {
    if let Some(existing) = self.main() {
      return Err(ComponentError::DuplicateMainComponent {
        existing: existing.name().to_string(),
        attempted: name.to_string(),
      });
    }

    let idx = self
      .components
      .iter()
      .position(|c| c.name() == name)
      .ok_or_else(|| ComponentError::NotFound(name.to_string()))?;
    let runtime_elements = self.components[idx]
      .configurations
      .runtime_elements
      .ok_or_else(|| ComponentError::NotPublishable(name.to_string()))?;

    let default = configurations.get(default_configuration)?;
    configurations.extend(default, runtime_elements)?;

    self.main = Some(idx);
    info!(component = name, "registered main component");
    Ok(())
  }

  /// Create and register the test component of the main component.
  ///
  /// The test component's implementation and runtime-only configurations
  /// extend the main component's. Its classpaths list the main component's
  /// output before its own resolved configurations, so freshly compiled
  /// classes shadow a stale published artifact with the same coordinates.
  ///
  /// The main component must already be registered.
  ///
  /// # Errors
  ///
  /// `MainComponentMissing` before the factory runs. `DuplicateName` or a
  /// configuration error after it ran; the configurations the factory created
  /// then stay in `configurations`, but the component registry is unchanged.
  /// Any error aborts the configuration of the project, which is discarded.
  pub fn wire_test_component(
    &mut self,
    factory: &dyn TestSuiteFactory,
    configurations: &mut ConfigurationRegistry,
  ) -> Result<&Component, ComponentError> {
    let main = self
      .main()
      .ok_or(ComponentError::MainComponentMissing)?
      .clone();

    let mut test = factory.create(configurations)?;
    if self.get(test.name()).is_some() {
      return Err(ComponentError::DuplicateName(test.name().to_string()));
    }

    let test_configs = test.configurations;
    configurations.extend(test_configs.implementation, main.configurations.implementation)?;
    configurations.extend(test_configs.runtime_only, main.configurations.runtime_only)?;

    test.compile_classpath = Classpath::new()
      .with_output(&main.output)
      .with_configuration(test_configs.compile_classpath);
    test.runtime_classpath = Classpath::new()
      .with_output(&test.output)
      .with_output(&main.output)
      .with_configuration(test_configs.runtime_classpath);

    info!(component = test.name(), main = main.name(), "wired test component");
    self.components.push(test);
    Ok(&self.components[self.components.len() - 1])
  }
}
