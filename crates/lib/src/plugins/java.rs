//! The Java plugin as an explicit phase pipeline.
//!
//! ```text
//! BaseConventions -> MainComponent -> RegisterMainComponent -> TestComponent -> CrossProjectLinks
//! ```
//!
//! The test component is wired only after the main component is registered;
//! [`ComponentRegistry::wire_test_component`] rejects any other order.
//!
//! [`ComponentRegistry::wire_test_component`]: crate::component::ComponentRegistry::wire_test_component

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::{BASE_PLUGIN, JAVA_PLUGIN};
use crate::component::{Component, ComponentConfigurations, ComponentError, SourceSetOutput, TestSuiteFactory};
use crate::configuration::{ConfigurationHandle, ConfigurationRegistry, ConfigurationRole};
use crate::consts::*;
use crate::linker::LinkDirection;
use crate::project::{Project, ProjectError};
use crate::tasks::{TaskAction, TaskDependency};

const BUILD_GROUP: &str = "build";
const VERIFICATION_GROUP: &str = "verification";
const DOCUMENTATION_GROUP: &str = "documentation";

/// A named step of the Java plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
  BaseConventions,
  MainComponent,
  RegisterMainComponent,
  TestComponent,
  CrossProjectLinks,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Phase::BaseConventions => "base-conventions",
      Phase::MainComponent => "main-component",
      Phase::RegisterMainComponent => "register-main-component",
      Phase::TestComponent => "test-component",
      Phase::CrossProjectLinks => "cross-project-links",
    };
    f.write_str(name)
  }
}

/// Phases that ran while applying a plugin, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhaseReport {
  phases: Vec<Phase>,
}

impl PhaseReport {
  pub fn phases(&self) -> &[Phase] {
    &self.phases
  }

  fn record(&mut self, project: &Project, phase: Phase) {
    debug!(project = %project.path(), phase = %phase, "plugin phase complete");
    self.phases.push(phase);
  }
}

/// Output of [`Phase::BaseConventions`].
pub struct BaseConventions {
  pub default_configuration: ConfigurationHandle,
}

/// Output of [`Phase::MainComponent`]: an added but unregistered component.
pub struct MainComponent {
  pub name: String,
}

/// Output of [`Phase::RegisterMainComponent`].
pub struct RegisteredMain {
  pub name: String,
}

/// Output of [`Phase::TestComponent`].
pub struct TestComponent {
  pub name: String,
}

/// Apply only the base conventions.
pub fn apply_base(project: &mut Project) -> Result<PhaseReport, ProjectError> {
  let mut report = PhaseReport::default();
  if project.mark_plugin_applied(BASE_PLUGIN) {
    base_conventions(project)?;
    report.record(project, Phase::BaseConventions);
  }
  Ok(report)
}

/// Apply the Java plugin, and the base conventions if they are missing.
pub fn apply(project: &mut Project) -> Result<PhaseReport, ProjectError> {
  let mut report = apply_base(project)?;
  if !project.mark_plugin_applied(JAVA_PLUGIN) {
    return Ok(report);
  }

  let main = main_component(project)?;
  report.record(project, Phase::MainComponent);

  let registered = register_main_component(project, main)?;
  report.record(project, Phase::RegisterMainComponent);

  let test = test_component(project, registered)?;
  report.record(project, Phase::TestComponent);

  cross_project_links(project, test)?;
  report.record(project, Phase::CrossProjectLinks);

  Ok(report)
}

/// The `default` configuration and lifecycle tasks.
pub fn base_conventions(project: &mut Project) -> Result<BaseConventions, ProjectError> {
  let default_configuration = project
    .configurations
    .create(DEFAULT_CONFIGURATION, ConfigurationRole::Legacy)?;
  project
    .configurations
    .set_description(default_configuration, "Configuration for default artifacts.")?;

  task(project, ASSEMBLE_TASK, BUILD_GROUP, "Assembles the outputs of this project.", &[])?;
  task(project, CHECK_TASK, VERIFICATION_GROUP, "Runs all checks.", &[])?;
  task(
    project,
    BUILD_TASK,
    BUILD_GROUP,
    "Assembles and tests this project.",
    &[ASSEMBLE_TASK, CHECK_TASK],
  )?;

  Ok(BaseConventions { default_configuration })
}

/// Create the main component's configurations, tasks and the component.
pub fn main_component(project: &mut Project) -> Result<MainComponent, ProjectError> {
  let configs = &mut project.configurations;

  let api = declare(configs, API_CONFIGURATION, ConfigurationRole::DeclarableOnly, "API dependencies for the main source set.")?;
  let implementation = declare(
    configs,
    IMPLEMENTATION_CONFIGURATION,
    ConfigurationRole::DeclarableOnly,
    "Implementation only dependencies for the main source set.",
  )?;
  let compile_only = declare(
    configs,
    COMPILE_ONLY_CONFIGURATION,
    ConfigurationRole::DeclarableOnly,
    "Compile only dependencies for the main source set.",
  )?;
  let compile_only_api = declare(
    configs,
    COMPILE_ONLY_API_CONFIGURATION,
    ConfigurationRole::DeclarableOnly,
    "Compile only API dependencies for the main source set.",
  )?;
  let runtime_only = declare(
    configs,
    RUNTIME_ONLY_CONFIGURATION,
    ConfigurationRole::DeclarableOnly,
    "Runtime only dependencies for the main source set.",
  )?;
  let compile_classpath = declare(
    configs,
    COMPILE_CLASSPATH_CONFIGURATION,
    ConfigurationRole::Resolvable,
    "Compile classpath for the main source set.",
  )?;
  let runtime_classpath = declare(
    configs,
    RUNTIME_CLASSPATH_CONFIGURATION,
    ConfigurationRole::Resolvable,
    "Runtime classpath of the main source set.",
  )?;
  let api_elements = declare(
    configs,
    API_ELEMENTS_CONFIGURATION,
    ConfigurationRole::Consumable,
    "API elements for the main component.",
  )?;
  let runtime_elements = declare(
    configs,
    RUNTIME_ELEMENTS_CONFIGURATION,
    ConfigurationRole::Consumable,
    "Runtime elements for the main component.",
  )?;
  let annotation_processor = declare(
    configs,
    ANNOTATION_PROCESSOR_CONFIGURATION,
    ConfigurationRole::Legacy,
    "Annotation processors and their dependencies for the main source set.",
  )?;

  configs.extend(implementation, api)?;
  configs.extend(compile_classpath, compile_only)?;
  configs.extend(compile_classpath, implementation)?;
  configs.extend(compile_classpath, compile_only_api)?;
  configs.extend(runtime_classpath, runtime_only)?;
  configs.extend(runtime_classpath, implementation)?;
  configs.extend(api_elements, api)?;
  configs.extend(api_elements, compile_only_api)?;
  configs.extend(runtime_elements, implementation)?;
  configs.extend(runtime_elements, runtime_only)?;

  task(project, PROCESS_RESOURCES_TASK, BUILD_GROUP, "Processes main resources.", &[])?;
  task(project, COMPILE_JAVA_TASK, BUILD_GROUP, "Compiles main Java source.", &[])?;
  task(
    project,
    CLASSES_TASK,
    BUILD_GROUP,
    "Assembles main classes.",
    &[COMPILE_JAVA_TASK, PROCESS_RESOURCES_TASK],
  )?;
  task(
    project,
    JAR_TASK,
    BUILD_GROUP,
    "Assembles a jar archive containing the classes of the 'main' feature.",
    &[CLASSES_TASK],
  )?;
  task(
    project,
    JAVADOC_TASK,
    DOCUMENTATION_GROUP,
    "Generates Javadoc API documentation for the 'main' feature.",
    &[CLASSES_TASK],
  )?;
  project
    .tasks
    .depends_on(ASSEMBLE_TASK, TaskDependency::local(JAR_TASK))?;

  let output = SourceSetOutput::conventional(project.project_dir(), MAIN_SOURCE_SET);
  let component = Component::new(
    JAVA_COMPONENT,
    MAIN_SOURCE_SET,
    output,
    ComponentConfigurations {
      implementation,
      compile_only,
      runtime_only,
      compile_classpath,
      runtime_classpath,
      annotation_processor,
      api: Some(api),
      compile_only_api: Some(compile_only_api),
      api_elements: Some(api_elements),
      runtime_elements: Some(runtime_elements),
    },
  );
  project.components.add(component)?;

  Ok(MainComponent {
    name: JAVA_COMPONENT.to_string(),
  })
}

/// Make the main component the project's published component.
pub fn register_main_component(project: &mut Project, main: MainComponent) -> Result<RegisteredMain, ProjectError> {
  project
    .components
    .register_main(&main.name, DEFAULT_CONFIGURATION, &mut project.configurations)?;
  Ok(RegisteredMain { name: main.name })
}

/// Create the test suite component on top of the registered main component.
pub fn test_component(project: &mut Project, main: RegisteredMain) -> Result<TestComponent, ProjectError> {
  let factory = JvmTestSuiteFactory::new(project.project_dir());
  let name = project
    .components
    .wire_test_component(&factory, &mut project.configurations)?
    .name()
    .to_string();
  debug!(project = %project.path(), main = %main.name, test = %name, "test suite ready");

  task(project, PROCESS_TEST_RESOURCES_TASK, BUILD_GROUP, "Processes test resources.", &[])?;
  task(
    project,
    COMPILE_TEST_JAVA_TASK,
    BUILD_GROUP,
    "Compiles test Java source.",
    &[CLASSES_TASK],
  )?;
  task(
    project,
    TEST_CLASSES_TASK,
    BUILD_GROUP,
    "Assembles test classes.",
    &[COMPILE_TEST_JAVA_TASK, PROCESS_TEST_RESOURCES_TASK],
  )?;
  task(project, TEST_TASK, VERIFICATION_GROUP, "Runs the test suite.", &[TEST_CLASSES_TASK])?;
  project
    .tasks
    .depends_on(CHECK_TASK, TaskDependency::local(TEST_TASK))?;

  Ok(TestComponent { name })
}

/// `buildNeeded` and `buildDependents`, linked across projects through the
/// test runtime classpath once every project is configured.
pub fn cross_project_links(project: &mut Project, test: TestComponent) -> Result<(), ProjectError> {
  let test_runtime_classpath = project
    .components
    .get(&test.name)
    .map(|c| project.configurations.name_of(c.configurations.runtime_classpath).to_string())
    .ok_or_else(|| ComponentError::NotFound(test.name.clone()))?;

  task(
    project,
    BUILD_NEEDED_TASK,
    BUILD_GROUP,
    "Assembles and tests this project and all projects it depends on.",
    &[BUILD_TASK],
  )?;
  project.tasks.configure(
    BUILD_NEEDED_TASK,
    TaskAction::LinkAcrossProjects {
      configuration: test_runtime_classpath.clone(),
      direction: LinkDirection::Upstream,
      other_task: BUILD_NEEDED_TASK.to_string(),
    },
  )?;

  task(
    project,
    BUILD_DEPENDENTS_TASK,
    BUILD_GROUP,
    "Assembles and tests this project and all projects that depend on it.",
    &[BUILD_TASK],
  )?;
  project.tasks.configure(
    BUILD_DEPENDENTS_TASK,
    TaskAction::LinkAcrossProjects {
      configuration: test_runtime_classpath,
      direction: LinkDirection::Downstream,
      other_task: BUILD_DEPENDENTS_TASK.to_string(),
    },
  )?;
  Ok(())
}

/// Creates the built-in `test` suite of a JVM project.
pub struct JvmTestSuiteFactory {
  project_dir: PathBuf,
}

impl JvmTestSuiteFactory {
  pub fn new(project_dir: &Path) -> Self {
    Self {
      project_dir: project_dir.to_path_buf(),
    }
  }
}

impl TestSuiteFactory for JvmTestSuiteFactory {
  fn create(&self, configs: &mut ConfigurationRegistry) -> Result<Component, ComponentError> {
    let implementation = declare(
      configs,
      TEST_IMPLEMENTATION_CONFIGURATION,
      ConfigurationRole::DeclarableOnly,
      "Implementation only dependencies for the test source set.",
    )?;
    let compile_only = declare(
      configs,
      TEST_COMPILE_ONLY_CONFIGURATION,
      ConfigurationRole::DeclarableOnly,
      "Compile only dependencies for the test source set.",
    )?;
    let runtime_only = declare(
      configs,
      TEST_RUNTIME_ONLY_CONFIGURATION,
      ConfigurationRole::DeclarableOnly,
      "Runtime only dependencies for the test source set.",
    )?;
    let compile_classpath = declare(
      configs,
      TEST_COMPILE_CLASSPATH_CONFIGURATION,
      ConfigurationRole::Resolvable,
      "Compile classpath for the test source set.",
    )?;
    let runtime_classpath = declare(
      configs,
      TEST_RUNTIME_CLASSPATH_CONFIGURATION,
      ConfigurationRole::Resolvable,
      "Runtime classpath of the test source set.",
    )?;
    let annotation_processor = declare(
      configs,
      TEST_ANNOTATION_PROCESSOR_CONFIGURATION,
      ConfigurationRole::Legacy,
      "Annotation processors and their dependencies for the test source set.",
    )?;

    configs.extend(compile_classpath, compile_only)?;
    configs.extend(compile_classpath, implementation)?;
    configs.extend(runtime_classpath, runtime_only)?;
    configs.extend(runtime_classpath, implementation)?;

    Ok(Component::new(
      TEST_SOURCE_SET,
      TEST_SOURCE_SET,
      SourceSetOutput::conventional(&self.project_dir, TEST_SOURCE_SET),
      ComponentConfigurations {
        implementation,
        compile_only,
        runtime_only,
        compile_classpath,
        runtime_classpath,
        annotation_processor,
        api: None,
        compile_only_api: None,
        api_elements: None,
        runtime_elements: None,
      },
    ))
  }
}

fn declare(
  configs: &mut ConfigurationRegistry,
  name: &str,
  role: ConfigurationRole,
  description: &str,
) -> Result<ConfigurationHandle, crate::configuration::ConfigurationError> {
  let handle = configs.create(name, role)?;
  configs.set_description(handle, description)?;
  Ok(handle)
}

fn task(project: &mut Project, name: &str, group: &str, description: &str, depends_on: &[&str]) -> Result<(), ProjectError> {
  project.tasks.register(name)?;
  project.tasks.describe(name, group, description)?;
  for dependency in depends_on {
    project.tasks.depends_on(name, TaskDependency::local(dependency))?;
  }
  Ok(())
}
