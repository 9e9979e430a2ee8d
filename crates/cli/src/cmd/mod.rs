mod model;
mod resolve;
mod tasks;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use buildgraph_lib::build::{Build, BuildOptions};
use buildgraph_lib::eval::evaluate_build;

pub use model::cmd_model;
pub use resolve::cmd_resolve;
pub use tasks::cmd_tasks;

/// Evaluate the build description at `file`.
fn evaluate(file: &Path, parallel: bool) -> Result<Build> {
  let options = BuildOptions {
    parallel,
    ..BuildOptions::default()
  };
  debug!(file = %file.display(), parallel, "evaluating build description");
  evaluate_build(file, &options).with_context(|| format!("Failed to evaluate build: {}", file.display()))
}
