//! Implementation of the `bgraph model` command.
//!
//! Evaluates a build description and prints every project with its
//! configurations and components.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use serde_json::{Value, json};

use buildgraph_lib::component::HasBuildTasks;
use buildgraph_lib::project::Project;

use super::evaluate;
use crate::output::{OutputFormat, Status, format_elapsed, print_edge, print_field, print_heading, print_item, print_json, print_status};

pub fn cmd_model(file: &Path, parallel: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let build = evaluate(file, parallel)?;

  if output.is_json() {
    let projects: Vec<Value> = build.projects().values().map(project_json).collect();
    return print_json(&json!({
      "root_name": build.settings().root_name(),
      "projects": projects,
    }));
  }

  print_status(
    Status::Done,
    &format!(
      "Evaluated build '{}' ({} projects)",
      build.settings().root_name(),
      build.projects().len()
    ),
  );
  print_field("Duration", &format_elapsed(start.elapsed()));

  for project in build.projects().values() {
    println!();
    print_project(project);
  }
  Ok(())
}

fn print_project(project: &Project) {
  print_heading(&format!("Project {}", project.path()));
  let plugins: Vec<&str> = project.applied_plugins().collect();
  if !plugins.is_empty() {
    print_field("Plugins", &plugins.join(", "));
  }
  if !project.repositories.is_empty() {
    print_field("Repositories", &project.repositories.names().join(", "));
  }

  let configs = &project.configurations;
  for (handle, configuration) in configs.iter() {
    print_item(&format!("{} ({})", configuration.name(), configuration.role()));
    for parent in configs.extends_from(handle) {
      print_edge("extends", configs.name_of(parent));
    }
    for dependency in configuration.dependencies() {
      print_edge("declares", &dependency.to_string());
    }
  }

  for component in project.components.iter() {
    let main = project.components.main().map(|m| m.name()) == Some(component.name());
    let label = if main { " [main]" } else { "" };
    print_item(&format!("component {}{}", component.name(), label));
    print_edge("classes", &component.output.classes_dir.display().to_string());
  }
}

fn project_json(project: &Project) -> Value {
  let configs = &project.configurations;
  let configurations: Vec<Value> = configs
    .iter()
    .map(|(handle, configuration)| {
      let extends: Vec<&str> = configs.extends_from(handle).into_iter().map(|p| configs.name_of(p)).collect();
      let dependencies: Vec<String> = configuration.dependencies().iter().map(ToString::to_string).collect();
      json!({
        "name": configuration.name(),
        "role": configuration.role(),
        "description": configuration.description(),
        "extends": extends,
        "dependencies": dependencies,
      })
    })
    .collect();

  let main = project.components.main().map(|m| m.name().to_string());
  let components: Vec<Value> = project
    .components
    .iter()
    .map(|component| {
      json!({
        "name": component.name(),
        "source_set": component.source_set(),
        "main": main.as_deref() == Some(component.name()),
        "classes_dir": component.output.classes_dir,
        "build_tasks": component.build_tasks(),
      })
    })
    .collect();

  json!({
    "path": project.path(),
    "plugins": project.applied_plugins().collect::<Vec<_>>(),
    "repositories": project.repositories,
    "configurations": configurations,
    "components": components,
    "tasks": project.tasks.len(),
  })
}
