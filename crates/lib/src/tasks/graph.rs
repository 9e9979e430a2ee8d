//! Realized task graph.
//!
//! Task dependencies are recorded by name while projects are configured. This
//! module resolves them against the tasks that actually exist across the
//! build and builds a DAG from the result.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, info, warn};

use super::types::{MissingTaskError, TaskError, TaskId};
use crate::project::Projects;

/// A DAG of every task in the build.
///
/// Edges point from a dependency to its dependent.
#[derive(Debug)]
pub struct TaskGraph {
  graph: DiGraph<TaskId, ()>,
  nodes: HashMap<TaskId, NodeIndex>,
  missing: Vec<MissingTaskError>,
}

impl TaskGraph {
  /// Materialize the task graph from configured projects.
  ///
  /// A cross-project edge whose target does not exist is recorded as a
  /// [`MissingTaskError`] and skipped; the remaining edges are still added.
  ///
  /// # Errors
  ///
  /// Returns `NotFound` for a missing task of the same project and
  /// `CycleDetected` if the realized edges form a cycle.
  pub fn realize(projects: &Projects) -> Result<Self, TaskError> {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();
    let mut missing = Vec::new();

    // First pass: one node per task
    for project in projects.values() {
      for task in project.tasks.iter() {
        let id = TaskId::new(project.path(), task.name());
        let idx = graph.add_node(id.clone());
        nodes.insert(id, idx);
      }
    }

    // Second pass: edges from dependency to dependent
    for project in projects.values() {
      for task in project.tasks.iter() {
        let source = TaskId::new(project.path(), task.name());
        let dependent_idx = nodes[&source];

        for dependency in task.dependencies() {
          let target = dependency.target(project.path());
          match nodes.get(&target) {
            Some(&dep_idx) => {
              graph.add_edge(dep_idx, dependent_idx, ());
            }
            None if target.project == *project.path() => {
              return Err(TaskError::NotFound(target.to_string()));
            }
            None => {
              warn!(task = %source, missing = %target, "task dependency target does not exist");
              missing.push(MissingTaskError {
                source_task: source.clone(),
                target,
              });
            }
          }
        }
      }
    }

    let task_graph = Self { graph, nodes, missing };
    task_graph.verify_acyclic()?;

    info!(
      tasks = task_graph.graph.node_count(),
      edges = task_graph.graph.edge_count(),
      missing = task_graph.missing.len(),
      "realized task graph"
    );

    Ok(task_graph)
  }

  fn verify_acyclic(&self) -> Result<(), TaskError> {
    toposort(&self.graph, None).map_err(|cycle| TaskError::CycleDetected(self.graph[cycle.node_id()].clone()))?;
    Ok(())
  }

  /// Every task, dependencies before dependents.
  pub fn topological_order(&self) -> Result<Vec<TaskId>, TaskError> {
    let sorted =
      toposort(&self.graph, None).map_err(|cycle| TaskError::CycleDetected(self.graph[cycle.node_id()].clone()))?;
    Ok(sorted.into_iter().map(|idx| self.graph[idx].clone()).collect())
  }

  /// Direct dependencies of a task, sorted by identity.
  pub fn dependencies_of(&self, task: &TaskId) -> Vec<TaskId> {
    self.neighbors(task, Direction::Incoming)
  }

  /// Tasks that directly depend on `task`, sorted by identity.
  pub fn dependents_of(&self, task: &TaskId) -> Vec<TaskId> {
    self.neighbors(task, Direction::Outgoing)
  }

  fn neighbors(&self, task: &TaskId, direction: Direction) -> Vec<TaskId> {
    let Some(&idx) = self.nodes.get(task) else {
      return Vec::new();
    };
    let mut result: Vec<TaskId> = self
      .graph
      .neighbors_directed(idx, direction)
      .map(|n| self.graph[n].clone())
      .collect();
    result.sort();
    result.dedup();
    result
  }

  /// Every task the given task transitively depends on, in execution order.
  pub fn execution_plan(&self, task: &TaskId) -> Result<Vec<TaskId>, TaskError> {
    let Some(&root) = self.nodes.get(task) else {
      return Err(TaskError::NotFound(task.to_string()));
    };

    let mut required = std::collections::HashSet::new();
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
      if required.insert(idx) {
        stack.extend(self.graph.neighbors_directed(idx, Direction::Incoming));
      }
    }

    let order = toposort(&self.graph, None)
      .map_err(|cycle| TaskError::CycleDetected(self.graph[cycle.node_id()].clone()))?;
    let plan: Vec<TaskId> = order
      .into_iter()
      .filter(|idx| required.contains(idx))
      .map(|idx| self.graph[idx].clone())
      .collect();
    debug!(task = %task, count = plan.len(), "computed execution plan");
    Ok(plan)
  }

  pub fn contains(&self, task: &TaskId) -> bool {
    self.nodes.contains_key(task)
  }

  /// Edges that could not be materialized.
  pub fn missing(&self) -> &[MissingTaskError] {
    &self.missing
  }

  pub fn task_count(&self) -> usize {
    self.graph.node_count()
  }
}
