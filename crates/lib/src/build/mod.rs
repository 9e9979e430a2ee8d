//! Assembling configured projects into a build.
//!
//! A build starts from locked settings. Every included project is created and
//! configured independently, so projects can be configured in parallel with
//! each worker owning its project. Cross-project task edges are derived only
//! afterwards, from the finished and locked dependency graph.

mod types;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::configuration::{ConfigurationError, ConfigurationRole, DependencyRef};
use crate::description::{BuildDescription, ProjectDescription};
use crate::linker::{self, CrossProjectTaskEdge, LinkDirection};
use crate::plugins;
use crate::project::{Project, ProjectError, Projects};
use crate::settings::Settings;
use crate::tasks::{TaskAction, TaskGraph, TaskId};
use crate::types::ProjectPath;

pub use types::*;

/// Settings plus the projects they include.
#[derive(Debug)]
pub struct Build {
  settings: Settings,
  projects: Projects,
}

impl Build {
  /// # Errors
  ///
  /// `SettingsNotLocked` unless the settings lifecycle already finished.
  pub fn new(settings: Settings) -> Result<Self, BuildError> {
    if !settings.is_locked() {
      return Err(BuildError::SettingsNotLocked);
    }
    Ok(Self {
      settings,
      projects: Projects::new(),
    })
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  pub fn projects(&self) -> &Projects {
    &self.projects
  }

  pub fn project(&self, path: &ProjectPath) -> Result<&Project, BuildError> {
    self
      .projects
      .get(path)
      .ok_or_else(|| BuildError::ProjectNotFound(path.clone()))
  }

  /// Create and configure every included project.
  pub fn configure(&mut self, description: &BuildDescription, options: &BuildOptions) -> Result<(), BuildError> {
    self.configure_with_cancel(description, options, &AtomicBool::new(false))
  }

  /// Like [`configure`](Self::configure), stopping once `cancel` is set.
  ///
  /// A project whose configuration finishes after cancellation is observed
  /// is discarded. Projects finished before that are kept.
  pub fn configure_with_cancel(
    &mut self,
    description: &BuildDescription,
    options: &BuildOptions,
    cancel: &AtomicBool,
  ) -> Result<(), BuildError> {
    let settings = &self.settings;
    let empty = ProjectDescription::default();

    let configure_one = |path: &ProjectPath| -> Result<Option<Project>, BuildError> {
      if cancel.load(Ordering::Relaxed) {
        return Ok(None);
      }
      let project = configure_project(settings, path, description.project(path).unwrap_or(&empty))?;
      if cancel.load(Ordering::Relaxed) {
        debug!(project = %path, "discarding project configured after cancellation");
        return Ok(None);
      }
      Ok(Some(project))
    };

    let includes = settings.includes();
    let results: Vec<Result<Option<Project>, BuildError>> = if options.parallel {
      includes.par_iter().map(|path| configure_one(path)).collect()
    } else {
      includes.iter().map(|path| configure_one(path)).collect()
    };

    let mut configured = Vec::with_capacity(results.len());
    for result in results {
      if let Some(project) = result? {
        configured.push(project);
      }
    }

    for project in configured {
      self.projects.insert(project.path().clone(), project);
    }

    if cancel.load(Ordering::Relaxed) {
      warn!(configured = self.projects.len(), "build configuration cancelled");
      return Err(BuildError::Cancelled);
    }

    info!(
      projects = self.projects.len(),
      parallel = options.parallel,
      "configured projects"
    );
    Ok(())
  }

  /// Run deferred task actions now that every project is configured.
  ///
  /// Returns the cross-project edges that were added.
  pub fn configure_tasks(&mut self) -> Result<Vec<CrossProjectTaskEdge>, BuildError> {
    let mut pending = Vec::new();
    for project in self.projects.values_mut() {
      let path = project.path().clone();
      for (task, actions) in project.tasks.take_pending() {
        let id = TaskId::new(&path, &task);
        pending.extend(actions.into_iter().map(|action| (id.clone(), action)));
      }
    }

    let mut edges = Vec::new();
    for (task, action) in pending {
      match action {
        TaskAction::LinkAcrossProjects {
          configuration,
          direction,
          other_task,
        } => {
          edges.extend(self.link_across_projects(&task, &configuration, direction, &other_task)?);
        }
      }
    }

    debug!(edges = edges.len(), "configured task actions");
    Ok(edges)
  }

  /// Make `task` depend on `other_task` in every project related to its own
  /// through `configuration`.
  pub fn link_across_projects(
    &mut self,
    task: &TaskId,
    configuration: &str,
    direction: LinkDirection,
    other_task: &str,
  ) -> Result<Vec<CrossProjectTaskEdge>, BuildError> {
    let edges = linker::link_across_projects(&self.projects, task, configuration, direction, other_task)?;

    let project = self
      .projects
      .get_mut(&task.project)
      .ok_or_else(|| BuildError::ProjectNotFound(task.project.clone()))?;
    for edge in &edges {
      project
        .tasks
        .depends_on(&task.name, edge.dependency())
        .map_err(|e| BuildError::project(&task.project, e))?;
      debug!(task = %task, target = %edge.target_project, other = other_task, "added cross-project task edge");
    }
    Ok(edges)
  }

  /// Realize the task graph, running any task actions still pending.
  pub fn task_graph(&mut self) -> Result<TaskGraph, BuildError> {
    self.configure_tasks()?;
    Ok(TaskGraph::realize(&self.projects)?)
  }

  /// Resolve the transitive dependency set of a project's configuration.
  pub fn resolve(&self, project: &ProjectPath, configuration: &str) -> Result<Vec<DependencyRef>, BuildError> {
    let configurations = &self.project(project)?.configurations;
    let handle = configurations
      .get(configuration)
      .map_err(|e| BuildError::project(project, e))?;
    configurations
      .resolve_transitive_dependency_set(handle)
      .map_err(|e| BuildError::project(project, e))
  }
}

/// Configure a single project from its description.
///
/// Runs entirely on the calling worker; nothing outside the new project is
/// mutated.
fn configure_project(
  settings: &Settings,
  path: &ProjectPath,
  description: &ProjectDescription,
) -> Result<Project, BuildError> {
  let mut project = Project::new(path.clone());
  settings.apply_before_project(&mut project);

  for plugin in &description.plugins {
    plugins::apply_plugin(&mut project, plugin).map_err(|e| BuildError::project(path, e))?;
  }

  declare_configurations(&mut project, description).map_err(|e| BuildError::project(path, e))?;

  for (name, dependencies) in &description.dependencies {
    let handle = project
      .configurations
      .get(name)
      .map_err(|e| BuildError::project(path, e))?;
    for dependency in dependencies {
      if let Some(target) = dependency.project().filter(|t| !settings.is_included(t)) {
        return Err(BuildError::ProjectNotFound(target.clone()));
      }
      project
        .configurations
        .add_dependency(handle, dependency.clone())
        .map_err(|e| BuildError::project(path, e))?;
    }
  }

  declare_tasks(&mut project, description).map_err(|e| BuildError::project(path, e))?;

  project.lock();
  info!(
    project = %path,
    configurations = project.configurations.len(),
    components = project.components.len(),
    tasks = project.tasks.len(),
    "configured project"
  );
  Ok(project)
}

fn declare_configurations(project: &mut Project, description: &ProjectDescription) -> Result<(), ProjectError> {
  let configs = &mut project.configurations;
  let mut seen = BTreeSet::new();
  for declared in &description.configurations {
    if !seen.insert(declared.name.as_str()) {
      return Err(ConfigurationError::DuplicateName(declared.name.clone()).into());
    }
    // A plugin's configuration may be described again, but not with another role
    let handle = match configs.find(&declared.name) {
      Some(handle) => match declared.role {
        Some(role) if role != configs.configuration(handle).role() => {
          return Err(ConfigurationError::DuplicateName(declared.name.clone()).into());
        }
        _ => handle,
      },
      None => configs.create(&declared.name, declared.role.unwrap_or(ConfigurationRole::Legacy))?,
    };
    if let Some(text) = &declared.description {
      configs.set_description(handle, text)?;
    }
  }

  // Parents may be declared after their children
  for declared in &description.configurations {
    let child = configs.get(&declared.name)?;
    for parent in &declared.extends {
      let parent = configs.get(parent)?;
      configs.extend(child, parent)?;
    }
  }
  Ok(())
}

fn declare_tasks(project: &mut Project, description: &ProjectDescription) -> Result<(), ProjectError> {
  for declared in &description.tasks {
    project.tasks.maybe_register(&declared.name);
    if let Some(text) = &declared.description {
      let group = declared.group.as_deref().unwrap_or("other");
      project.tasks.describe(&declared.name, group, text)?;
    }
    // Malformed references are rejected when the description is validated
    for dependency in declared.dependencies().unwrap_or_default() {
      project.tasks.depends_on(&declared.name, dependency)?;
    }
  }
  Ok(())
}
