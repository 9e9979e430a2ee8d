//! Build description evaluation.
//!
//! This module provides [`evaluate_build`], which takes a path to a JSON build
//! description and returns the configured [`Build`].

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::build::{Build, BuildError, BuildOptions};
use crate::description::{BuildDescription, DescriptionError};
use crate::settings::{Settings, SettingsError, SettingsLifecycle};

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
  #[error(transparent)]
  Description(#[from] DescriptionError),

  #[error("settings evaluation failed: {0}")]
  Settings(#[from] SettingsError),

  #[error(transparent)]
  Build(#[from] BuildError),
}

/// Evaluate a build description file.
///
/// This function:
/// 1. Loads and validates the description
/// 2. Runs the settings lifecycle, which injects the auxiliary repositories
///    and locks the settings
/// 3. Configures every included project
/// 4. Runs deferred task actions, deriving cross-project task edges
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use buildgraph_lib::build::BuildOptions;
/// use buildgraph_lib::eval::evaluate_build;
///
/// let build = evaluate_build(Path::new("build.json"), &BuildOptions::default())?;
/// println!("Projects: {}", build.projects().len());
/// ```
pub fn evaluate_build(path: &Path, options: &BuildOptions) -> Result<Build, EvalError> {
  let description = BuildDescription::from_file(path)?;
  evaluate_description(&description, options)
}

/// Evaluate an already loaded description.
pub fn evaluate_description(description: &BuildDescription, options: &BuildOptions) -> Result<Build, EvalError> {
  description.validate()?;

  let mut settings = Settings::new(&description.settings.root_name);
  let mut lifecycle = SettingsLifecycle::new(options.auxiliary_repositories.clone());
  lifecycle.run(&mut settings, |s| description.settings.apply(s))?;

  let mut build = Build::new(settings)?;
  build.configure(description, options)?;
  let edges = build.configure_tasks()?;

  info!(
    root = build.settings().root_name(),
    projects = build.projects().len(),
    cross_project_edges = edges.len(),
    "evaluated build"
  );
  Ok(build)
}
