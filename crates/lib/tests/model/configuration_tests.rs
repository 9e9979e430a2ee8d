use buildgraph_lib::configuration::{ConfigurationError, ConfigurationRegistry, ConfigurationRole, DependencyRef};
use buildgraph_lib::consts::{IMPLEMENTATION_CONFIGURATION, RUNTIME_CLASSPATH_CONFIGURATION};

use super::common::{evaluate, path};

fn module(coordinates: &str) -> DependencyRef {
  DependencyRef::Module(coordinates.parse().unwrap())
}

#[test]
fn runtime_classpath_resolves_implementation_dependency() {
  let mut registry = ConfigurationRegistry::new();
  let implementation = registry
    .create(IMPLEMENTATION_CONFIGURATION, ConfigurationRole::DeclarableOnly)
    .unwrap();
  let runtime_classpath = registry
    .create(RUNTIME_CLASSPATH_CONFIGURATION, ConfigurationRole::Resolvable)
    .unwrap();
  registry.extend(runtime_classpath, implementation).unwrap();

  let d = module("org.example:d:1.0");
  registry.add_dependency(implementation, d.clone()).unwrap();

  let handle = registry.get(RUNTIME_CLASSPATH_CONFIGURATION).unwrap();
  assert_eq!(registry.resolve_transitive_dependency_set(handle).unwrap(), vec![d]);
}

#[test]
fn chain_resolves_union_once_in_stable_order() {
  let mut registry = ConfigurationRegistry::new();
  let a = registry.create("a", ConfigurationRole::Legacy).unwrap();
  let b = registry.create("b", ConfigurationRole::Legacy).unwrap();
  let c = registry.create("c", ConfigurationRole::Legacy).unwrap();
  registry.extend(a, b).unwrap();
  registry.extend(b, c).unwrap();

  let shared = module("org.example:shared:1.0");
  registry.add_dependency(a, module("org.example:a:1.0")).unwrap();
  registry.add_dependency(a, shared.clone()).unwrap();
  registry.add_dependency(b, module("org.example:b:1.0")).unwrap();
  registry.add_dependency(c, module("org.example:c:1.0")).unwrap();
  registry.add_dependency(c, shared.clone()).unwrap();

  let first = registry.resolve_transitive_dependency_set(a).unwrap();
  assert_eq!(
    first,
    vec![
      module("org.example:c:1.0"),
      shared,
      module("org.example:b:1.0"),
      module("org.example:a:1.0"),
    ]
  );
  assert_eq!(registry.resolve_transitive_dependency_set(a).unwrap(), first);
}

#[test]
fn cycles_rejected_without_changing_registry() {
  let mut registry = ConfigurationRegistry::new();
  let a = registry.create("a", ConfigurationRole::Legacy).unwrap();
  let b = registry.create("b", ConfigurationRole::Legacy).unwrap();

  assert!(matches!(
    registry.extend(a, a),
    Err(ConfigurationError::CyclicInheritance { .. })
  ));

  registry.extend(a, b).unwrap();
  assert_eq!(
    registry.extend(b, a).unwrap_err(),
    ConfigurationError::CyclicInheritance {
      child: "b".to_string(),
      parent: "a".to_string()
    }
  );
  assert!(registry.extends_from(b).is_empty());
  assert_eq!(registry.extends_from(a), vec![b]);
}

#[test]
fn configured_projects_are_locked() {
  let build = evaluate(
    r#"{
      "settings": { "include": [":app"] },
      "projects": { ":app": {
        "plugins": ["java"],
        "dependencies": { "implementation": [{ "module": "org.example:d:1.0" }] }
      } }
    }"#,
  );
  let app = build.project(&path(":app")).unwrap();

  assert!(app.configurations.is_locked());
  assert_eq!(
    build.resolve(&path(":app"), RUNTIME_CLASSPATH_CONFIGURATION).unwrap(),
    vec![module("org.example:d:1.0")]
  );
}
