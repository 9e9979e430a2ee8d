//! Per-project registry of configuration nodes and their inheritance edges.
//!
//! The registry keeps configurations in a directed graph where an edge
//! `child -> parent` means "child extends from parent". Edge weights record
//! the order in which inheritance was declared so that resolution is stable.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, trace};

use super::types::{Configuration, ConfigurationError, ConfigurationHandle, ConfigurationRole, DependencyRef};

/// Named configurations of a single project.
#[derive(Debug, Default)]
pub struct ConfigurationRegistry {
  graph: DiGraph<Configuration, usize>,
  by_name: HashMap<String, NodeIndex>,
  locked: bool,
}

impl ConfigurationRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a new configuration.
  ///
  /// # Errors
  ///
  /// `DuplicateName` if the name is taken, `Locked` after [`lock`](Self::lock).
  pub fn create(&mut self, name: &str, role: ConfigurationRole) -> Result<ConfigurationHandle, ConfigurationError> {
    self.ensure_unlocked(name, "create")?;
    if self.by_name.contains_key(name) {
      return Err(ConfigurationError::DuplicateName(name.to_string()));
    }

    let idx = self.graph.add_node(Configuration::new(name, role));
    self.by_name.insert(name.to_string(), idx);
    debug!(configuration = name, role = %role, "created configuration");
    Ok(ConfigurationHandle(idx))
  }

  /// Look up a configuration by name.
  pub fn get(&self, name: &str) -> Result<ConfigurationHandle, ConfigurationError> {
    self
      .find(name)
      .ok_or_else(|| ConfigurationError::NotFound(name.to_string()))
  }

  pub fn find(&self, name: &str) -> Option<ConfigurationHandle> {
    self.by_name.get(name).copied().map(ConfigurationHandle)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.by_name.contains_key(name)
  }

  pub fn configuration(&self, handle: ConfigurationHandle) -> &Configuration {
    &self.graph[handle.0]
  }

  pub fn name_of(&self, handle: ConfigurationHandle) -> &str {
    self.graph[handle.0].name()
  }

  /// Make `child` extend from `parent`.
  ///
  /// Adding an edge that already exists is a no-op. The registry is left
  /// untouched when the call fails.
  ///
  /// # Errors
  ///
  /// `CyclicInheritance` if `parent` already reaches `child` (including
  /// `child == parent`), `Locked` after [`lock`](Self::lock).
  pub fn extend(&mut self, child: ConfigurationHandle, parent: ConfigurationHandle) -> Result<(), ConfigurationError> {
    let child_name = self.name_of(child).to_string();
    self.ensure_unlocked(&child_name, "extend")?;

    if self.graph.contains_edge(child.0, parent.0) {
      return Ok(());
    }

    if has_path_connecting(&self.graph, parent.0, child.0, None) {
      return Err(ConfigurationError::CyclicInheritance {
        child: child_name,
        parent: self.name_of(parent).to_string(),
      });
    }

    let order = self.graph.edge_count();
    self.graph.add_edge(child.0, parent.0, order);
    debug!(child = %child_name, parent = %self.name_of(parent), "configuration extends from");
    Ok(())
  }

  /// Direct parents of a configuration, in the order they were declared.
  pub fn extends_from(&self, handle: ConfigurationHandle) -> Vec<ConfigurationHandle> {
    let mut edges: Vec<(usize, NodeIndex)> = self
      .graph
      .edges_directed(handle.0, Direction::Outgoing)
      .map(|edge| (*edge.weight(), edge.target()))
      .collect();
    edges.sort_unstable();
    edges.into_iter().map(|(_, idx)| ConfigurationHandle(idx)).collect()
  }

  /// Declare a dependency on a configuration. Re-declaring is a no-op.
  ///
  /// # Errors
  ///
  /// `NotDeclarable` if the role forbids declarations, `Locked` after
  /// [`lock`](Self::lock).
  pub fn add_dependency(
    &mut self,
    handle: ConfigurationHandle,
    dependency: DependencyRef,
  ) -> Result<(), ConfigurationError> {
    let name = self.name_of(handle).to_string();
    self.ensure_unlocked(&name, "add a dependency to")?;

    let configuration = &mut self.graph[handle.0];
    if !configuration.role().can_be_declared() {
      return Err(ConfigurationError::NotDeclarable(name));
    }
    if configuration.push_dependency(dependency.clone()) {
      debug!(configuration = %name, dependency = %dependency, "declared dependency");
    }
    Ok(())
  }

  pub fn set_description(&mut self, handle: ConfigurationHandle, description: &str) -> Result<(), ConfigurationError> {
    let name = self.name_of(handle).to_string();
    self.ensure_unlocked(&name, "describe")?;
    self.graph[handle.0].set_description(description);
    Ok(())
  }

  /// Flatten the dependencies of a configuration and everything it extends.
  ///
  /// Parents are visited depth-first in declaration order before the
  /// configuration's own dependencies. Each node is visited once per call and
  /// each dependency appears once, at its first occurrence.
  ///
  /// # Errors
  ///
  /// `NotResolvable` unless the configuration's role allows resolution.
  pub fn resolve_transitive_dependency_set(
    &self,
    handle: ConfigurationHandle,
  ) -> Result<Vec<DependencyRef>, ConfigurationError> {
    let configuration = self.configuration(handle);
    if !configuration.role().can_be_resolved() {
      return Err(ConfigurationError::NotResolvable(configuration.name().to_string()));
    }
    Ok(self.collect_dependencies(handle))
  }

  /// Like [`resolve_transitive_dependency_set`](Self::resolve_transitive_dependency_set)
  /// but ignores the configuration's role. Used for graph queries that only
  /// inspect declared coordinates.
  pub fn collect_dependencies(&self, handle: ConfigurationHandle) -> Vec<DependencyRef> {
    let mut visited = HashSet::new();
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    self.visit(handle, &mut visited, &mut seen, &mut result);
    trace!(
      configuration = %self.name_of(handle),
      count = result.len(),
      "collected transitive dependencies"
    );
    result
  }

  fn visit(
    &self,
    handle: ConfigurationHandle,
    visited: &mut HashSet<NodeIndex>,
    seen: &mut HashSet<DependencyRef>,
    result: &mut Vec<DependencyRef>,
  ) {
    if !visited.insert(handle.0) {
      return;
    }

    for parent in self.extends_from(handle) {
      self.visit(parent, visited, seen, result);
    }

    for dependency in self.configuration(handle).dependencies() {
      if seen.insert(dependency.clone()) {
        result.push(dependency.clone());
      }
    }
  }

  /// Prevent any further mutation of this registry.
  pub fn lock(&mut self) {
    self.locked = true;
  }

  pub fn is_locked(&self) -> bool {
    self.locked
  }

  /// All configurations in creation order.
  pub fn iter(&self) -> impl Iterator<Item = (ConfigurationHandle, &Configuration)> {
    self
      .graph
      .node_indices()
      .map(|idx| (ConfigurationHandle(idx), &self.graph[idx]))
  }

  pub fn len(&self) -> usize {
    self.graph.node_count()
  }

  pub fn is_empty(&self) -> bool {
    self.graph.node_count() == 0
  }

  fn ensure_unlocked(&self, name: &str, operation: &'static str) -> Result<(), ConfigurationError> {
    if self.locked {
      return Err(ConfigurationError::Locked {
        name: name.to_string(),
        operation,
      });
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::ModuleCoordinates;

  fn module(s: &str) -> DependencyRef {
    DependencyRef::Module(s.parse::<ModuleCoordinates>().unwrap())
  }

  mod create_and_get {
    use super::*;

    #[test]
    fn create_then_get() {
      let mut registry = ConfigurationRegistry::new();
      let handle = registry.create("implementation", ConfigurationRole::DeclarableOnly).unwrap();

      assert_eq!(registry.get("implementation").unwrap(), handle);
      assert_eq!(registry.configuration(handle).role(), ConfigurationRole::DeclarableOnly);
      assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_name_fails() {
      let mut registry = ConfigurationRegistry::new();
      registry.create("api", ConfigurationRole::DeclarableOnly).unwrap();

      let err = registry.create("api", ConfigurationRole::Resolvable).unwrap_err();
      assert_eq!(err, ConfigurationError::DuplicateName("api".to_string()));
      assert_eq!(registry.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
      let mut registry = ConfigurationRegistry::new();
      registry.create("api", ConfigurationRole::DeclarableOnly).unwrap();
      registry.create("API", ConfigurationRole::DeclarableOnly).unwrap();
      assert_eq!(registry.len(), 2);
    }

    #[test]
    fn missing_name_fails() {
      let registry = ConfigurationRegistry::new();
      assert_eq!(
        registry.get("nope").unwrap_err(),
        ConfigurationError::NotFound("nope".to_string())
      );
    }

    #[test]
    fn iter_preserves_creation_order() {
      let mut registry = ConfigurationRegistry::new();
      registry.create("b", ConfigurationRole::Legacy).unwrap();
      registry.create("a", ConfigurationRole::Legacy).unwrap();
      registry.create("c", ConfigurationRole::Legacy).unwrap();

      let names: Vec<&str> = registry.iter().map(|(_, c)| c.name()).collect();
      assert_eq!(names, vec!["b", "a", "c"]);
    }
  }

  mod inheritance {
    use super::*;

    #[test]
    fn self_extension_is_a_cycle() {
      let mut registry = ConfigurationRegistry::new();
      let a = registry.create("a", ConfigurationRole::Legacy).unwrap();

      let err = registry.extend(a, a).unwrap_err();
      assert!(matches!(err, ConfigurationError::CyclicInheritance { .. }));
      assert!(registry.extends_from(a).is_empty());
    }

    #[test]
    fn two_node_cycle_leaves_state_unchanged() {
      let mut registry = ConfigurationRegistry::new();
      let a = registry.create("a", ConfigurationRole::Legacy).unwrap();
      let b = registry.create("b", ConfigurationRole::Legacy).unwrap();

      registry.extend(a, b).unwrap();
      let err = registry.extend(b, a).unwrap_err();

      assert_eq!(
        err,
        ConfigurationError::CyclicInheritance {
          child: "b".to_string(),
          parent: "a".to_string()
        }
      );
      assert_eq!(registry.extends_from(a), vec![b]);
      assert!(registry.extends_from(b).is_empty());
    }

    #[test]
    fn longer_cycle_detected() {
      let mut registry = ConfigurationRegistry::new();
      let a = registry.create("a", ConfigurationRole::Legacy).unwrap();
      let b = registry.create("b", ConfigurationRole::Legacy).unwrap();
      let c = registry.create("c", ConfigurationRole::Legacy).unwrap();

      registry.extend(a, b).unwrap();
      registry.extend(b, c).unwrap();
      assert!(registry.extend(c, a).is_err());
    }

    #[test]
    fn repeated_edge_is_noop() {
      let mut registry = ConfigurationRegistry::new();
      let a = registry.create("a", ConfigurationRole::Legacy).unwrap();
      let b = registry.create("b", ConfigurationRole::Legacy).unwrap();

      registry.extend(a, b).unwrap();
      registry.extend(a, b).unwrap();
      assert_eq!(registry.extends_from(a), vec![b]);
    }

    #[test]
    fn parents_listed_in_declaration_order() {
      let mut registry = ConfigurationRegistry::new();
      let child = registry.create("child", ConfigurationRole::Legacy).unwrap();
      let z = registry.create("z", ConfigurationRole::Legacy).unwrap();
      let y = registry.create("y", ConfigurationRole::Legacy).unwrap();
      let x = registry.create("x", ConfigurationRole::Legacy).unwrap();

      registry.extend(child, z).unwrap();
      registry.extend(child, x).unwrap();
      registry.extend(child, y).unwrap();

      assert_eq!(registry.extends_from(child), vec![z, x, y]);
    }
  }

  mod resolution {
    use super::*;

    #[test]
    fn chain_yields_union_parents_first() {
      let mut registry = ConfigurationRegistry::new();
      let a = registry.create("a", ConfigurationRole::Legacy).unwrap();
      let b = registry.create("b", ConfigurationRole::Legacy).unwrap();
      let c = registry.create("c", ConfigurationRole::Legacy).unwrap();
      registry.extend(a, b).unwrap();
      registry.extend(b, c).unwrap();

      registry.add_dependency(a, module("g:a:1")).unwrap();
      registry.add_dependency(b, module("g:b:1")).unwrap();
      registry.add_dependency(c, module("g:c:1")).unwrap();

      let first = registry.resolve_transitive_dependency_set(a).unwrap();
      assert_eq!(first, vec![module("g:c:1"), module("g:b:1"), module("g:a:1")]);

      let second = registry.resolve_transitive_dependency_set(a).unwrap();
      assert_eq!(first, second);
    }

    #[test]
    fn diamond_visits_shared_parent_once() {
      let mut registry = ConfigurationRegistry::new();
      let top = registry.create("top", ConfigurationRole::Resolvable).unwrap();
      let left = registry.create("left", ConfigurationRole::DeclarableOnly).unwrap();
      let right = registry.create("right", ConfigurationRole::DeclarableOnly).unwrap();
      let base = registry.create("base", ConfigurationRole::DeclarableOnly).unwrap();

      registry.extend(top, left).unwrap();
      registry.extend(top, right).unwrap();
      registry.extend(left, base).unwrap();
      registry.extend(right, base).unwrap();

      registry.add_dependency(base, module("g:base:1")).unwrap();
      registry.add_dependency(left, module("g:shared:1")).unwrap();
      registry.add_dependency(right, module("g:shared:1")).unwrap();
      registry.add_dependency(right, module("g:right:1")).unwrap();

      let resolved = registry.resolve_transitive_dependency_set(top).unwrap();
      assert_eq!(
        resolved,
        vec![module("g:base:1"), module("g:shared:1"), module("g:right:1")]
      );
    }

    #[test]
    fn declarable_only_is_not_resolvable() {
      let mut registry = ConfigurationRegistry::new();
      let api = registry.create("api", ConfigurationRole::DeclarableOnly).unwrap();

      assert_eq!(
        registry.resolve_transitive_dependency_set(api).unwrap_err(),
        ConfigurationError::NotResolvable("api".to_string())
      );
    }

    #[test]
    fn resolvable_rejects_declarations() {
      let mut registry = ConfigurationRegistry::new();
      let classpath = registry.create("compileClasspath", ConfigurationRole::Resolvable).unwrap();

      let err = registry.add_dependency(classpath, module("g:n:1")).unwrap_err();
      assert_eq!(err, ConfigurationError::NotDeclarable("compileClasspath".to_string()));
    }

    #[test]
    fn duplicate_declaration_ignored() {
      let mut registry = ConfigurationRegistry::new();
      let impl_ = registry.create("implementation", ConfigurationRole::DeclarableOnly).unwrap();
      registry.add_dependency(impl_, module("g:n:1")).unwrap();
      registry.add_dependency(impl_, module("g:n:1")).unwrap();

      assert_eq!(registry.configuration(impl_).dependencies().len(), 1);
    }
  }

  mod locking {
    use super::*;

    #[test]
    fn mutations_fail_after_lock() {
      let mut registry = ConfigurationRegistry::new();
      let a = registry.create("a", ConfigurationRole::Legacy).unwrap();
      let b = registry.create("b", ConfigurationRole::Legacy).unwrap();
      registry.lock();

      assert!(matches!(
        registry.create("c", ConfigurationRole::Legacy),
        Err(ConfigurationError::Locked { .. })
      ));
      assert!(matches!(registry.extend(a, b), Err(ConfigurationError::Locked { .. })));
      assert!(matches!(
        registry.add_dependency(a, module("g:n:1")),
        Err(ConfigurationError::Locked { .. })
      ));
    }

    #[test]
    fn reads_succeed_after_lock() {
      let mut registry = ConfigurationRegistry::new();
      let a = registry.create("a", ConfigurationRole::Legacy).unwrap();
      registry.add_dependency(a, module("g:n:1")).unwrap();
      registry.lock();

      assert!(registry.is_locked());
      assert_eq!(registry.resolve_transitive_dependency_set(a).unwrap().len(), 1);
    }
  }
}
