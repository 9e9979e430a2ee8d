use buildgraph_lib::build::{Build, BuildOptions};
use buildgraph_lib::description::BuildDescription;
use buildgraph_lib::eval::evaluate_description;
use buildgraph_lib::types::ProjectPath;

pub fn path(s: &str) -> ProjectPath {
  s.parse().unwrap()
}

/// Evaluate a JSON build description with default options.
pub fn evaluate(json: &str) -> Build {
  let description = BuildDescription::from_str(json).unwrap();
  evaluate_description(&description, &BuildOptions::default()).unwrap()
}
