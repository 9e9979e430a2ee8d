use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use buildgraph_lib::types::ProjectPath;

use super::evaluate;
use crate::output::{OutputFormat, Status, print_item, print_json, print_status};

pub fn cmd_resolve(file: &Path, project: &str, configuration: &str, parallel: bool, output: OutputFormat) -> Result<()> {
  let path: ProjectPath = project
    .parse()
    .with_context(|| format!("Invalid project path: {}", project))?;
  let build = evaluate(file, parallel)?;

  let dependencies = build
    .resolve(&path, configuration)
    .with_context(|| format!("Failed to resolve {} of {}", configuration, path))?;

  if output.is_json() {
    let items: Vec<String> = dependencies.iter().map(ToString::to_string).collect();
    print_json(&json!({
      "project": path,
      "configuration": configuration,
      "dependencies": items,
    }))?;
  } else {
    print_status(
      Status::Done,
      &format!(
        "{} of {}: {} dependencies",
        configuration,
        path,
        dependencies.len()
      ),
    );
    for dependency in &dependencies {
      print_item(&dependency.to_string());
    }
  }

  Ok(())
}
