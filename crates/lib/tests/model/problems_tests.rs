use buildgraph_lib::problems::{ProblemLocationResolver, StackFrame};

#[test]
fn empty_stack_has_unknown_location() {
  assert!(ProblemLocationResolver::default().locate(&[]).is_none());
}

#[test]
fn internal_frame_skipped_for_user_frame() {
  let internal = StackFrame::new("org.gradle.internal.Dispatch", "dispatch").at("Dispatch.java", 40);
  let user = StackFrame::new("Build_gradle", "invoke").at("build.gradle", 7);

  let location = ProblemLocationResolver::default().locate(&[internal, user]).unwrap();
  assert_eq!(location.source, "build.gradle");
  assert_eq!(location.to_string(), "build.gradle: line 7");
}
