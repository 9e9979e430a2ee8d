//! Implementation of the `bgraph tasks` command.
//!
//! Realizes the task graph and prints every task after the tasks it depends
//! on. Cross-project edges whose target does not exist are listed as
//! warnings; they do not fail the command.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Value, json};

use super::evaluate;
use crate::output::{OutputFormat, Status, print_edge, print_item, print_json, print_status};

pub fn cmd_tasks(file: &Path, parallel: bool, output: OutputFormat) -> Result<()> {
  let mut build = evaluate(file, parallel)?;
  let graph = build.task_graph().context("Failed to realize task graph")?;
  let order = graph.topological_order().context("Failed to order tasks")?;

  if output.is_json() {
    let tasks: Vec<Value> = order
      .iter()
      .map(|task| {
        let dependencies: Vec<String> = graph.dependencies_of(task).iter().map(ToString::to_string).collect();
        json!({ "task": task.to_string(), "dependencies": dependencies })
      })
      .collect();
    return print_json(&json!({ "tasks": tasks, "missing": graph.missing() }));
  }

  print_status(Status::Done, &format!("Task graph: {} tasks", graph.task_count()));
  for task in &order {
    print_item(&task.to_string());
    for dependency in graph.dependencies_of(task) {
      print_edge("after", &dependency.to_string());
    }
  }

  for missing in graph.missing() {
    print_status(Status::Warning, &missing.to_string());
  }
  Ok(())
}
