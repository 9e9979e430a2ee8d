use buildgraph_lib::build::{Build, BuildOptions};
use buildgraph_lib::consts::{BUILD_DEPENDENTS_TASK, BUILD_NEEDED_TASK, TEST_RUNTIME_CLASSPATH_CONFIGURATION};
use buildgraph_lib::description::BuildDescription;
use buildgraph_lib::linker::{LinkDirection, related_projects};
use buildgraph_lib::settings::{Settings, SettingsLifecycle};
use buildgraph_lib::tasks::{TaskDependency, TaskId};

use super::common::{evaluate, path};

const P1_P2: &str = r#"{
  "settings": { "include": [":p1", ":p2"] },
  "projects": {
    ":p1": { "plugins": ["java"] },
    ":p2": {
      "plugins": ["java"],
      "dependencies": { "testImplementation": [{ "project": ":p1" }] }
    }
  }
}"#;

/// Settings and projects configured, task actions not yet run.
fn configured(json: &str, includes: &[&str]) -> Build {
  let mut settings = Settings::new("demo");
  SettingsLifecycle::default()
    .run(&mut settings, |s| {
      for include in includes {
        s.include(path(include))?;
      }
      Ok(())
    })
    .unwrap();
  let mut build = Build::new(settings).unwrap();
  build
    .configure(&BuildDescription::from_str(json).unwrap(), &BuildOptions::default())
    .unwrap();
  build
}

#[test]
fn build_needed_links_upstream_over_test_runtime_classpath() {
  let mut build = configured(P1_P2, &[":p1", ":p2"]);
  let task = TaskId::new(&path(":p2"), BUILD_NEEDED_TASK);

  let edges = build
    .link_across_projects(&task, TEST_RUNTIME_CLASSPATH_CONFIGURATION, LinkDirection::Upstream, BUILD_NEEDED_TASK)
    .unwrap();

  assert_eq!(edges.len(), 1);
  assert_eq!(edges[0].target_project, path(":p1"));
  let p2 = build.project(&path(":p2")).unwrap();
  assert!(
    p2.tasks
      .get(BUILD_NEEDED_TASK)
      .unwrap()
      .dependencies()
      .contains(&TaskDependency::project(&path(":p1"), BUILD_NEEDED_TASK))
  );
}

#[test]
fn build_dependents_links_downstream() {
  let mut build = evaluate(P1_P2);
  let graph = build.task_graph().unwrap();

  let p1_dependents = TaskId::new(&path(":p1"), BUILD_DEPENDENTS_TASK);
  assert!(
    graph
      .dependencies_of(&p1_dependents)
      .contains(&TaskId::new(&path(":p2"), BUILD_DEPENDENTS_TASK))
  );

  let plan = graph.execution_plan(&TaskId::new(&path(":p2"), BUILD_NEEDED_TASK)).unwrap();
  let position = |project: &str, task: &str| plan.iter().position(|t| *t == TaskId::new(&path(project), task));
  let p1_needed = position(":p1", BUILD_NEEDED_TASK).unwrap();
  let p2_needed = position(":p2", BUILD_NEEDED_TASK).unwrap();
  assert!(p1_needed < p2_needed);
  assert!(position(":p1", "build").unwrap() < p1_needed);
}

#[test]
fn related_projects_are_pure_queries() {
  let build = configured(P1_P2, &[":p1", ":p2"]);
  let query = || {
    related_projects(
      build.projects(),
      &path(":p1"),
      TEST_RUNTIME_CLASSPATH_CONFIGURATION,
      LinkDirection::Downstream,
    )
    .unwrap()
  };
  assert_eq!(query(), vec![path(":p2")]);
  assert_eq!(query(), query());
}

#[test]
fn missing_target_task_is_isolated() {
  // :p1 has no java plugin, so it has no buildNeeded task to link onto
  let json = r#"{
    "settings": { "include": [":p1", ":p2", ":p3"] },
    "projects": {
      ":p1": {
        "configurations": [{ "name": "testRuntimeClasspath" }],
        "tasks": [{ "name": "compile" }]
      },
      ":p3": { "plugins": ["java"] },
      ":p2": {
        "plugins": ["java"],
        "dependencies": { "testImplementation": [{ "project": ":p1" }, { "project": ":p3" }] }
      }
    }
  }"#;
  let mut build = evaluate(json);
  let graph = build.task_graph().unwrap();

  assert_eq!(graph.missing().len(), 1);
  assert_eq!(graph.missing()[0].target, TaskId::new(&path(":p1"), BUILD_NEEDED_TASK));
  assert!(
    graph
      .dependencies_of(&TaskId::new(&path(":p2"), BUILD_NEEDED_TASK))
      .contains(&TaskId::new(&path(":p3"), BUILD_NEEDED_TASK))
  );
}
