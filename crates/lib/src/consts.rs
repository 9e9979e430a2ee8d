//! Conventional configuration and task names.

/// Configuration every project has; consumers that ask for no particular
/// variant get its contents.
pub const DEFAULT_CONFIGURATION: &str = "default";

pub const API_CONFIGURATION: &str = "api";
pub const IMPLEMENTATION_CONFIGURATION: &str = "implementation";
pub const COMPILE_ONLY_CONFIGURATION: &str = "compileOnly";
pub const COMPILE_ONLY_API_CONFIGURATION: &str = "compileOnlyApi";
pub const RUNTIME_ONLY_CONFIGURATION: &str = "runtimeOnly";
pub const COMPILE_CLASSPATH_CONFIGURATION: &str = "compileClasspath";
pub const RUNTIME_CLASSPATH_CONFIGURATION: &str = "runtimeClasspath";
pub const API_ELEMENTS_CONFIGURATION: &str = "apiElements";
pub const RUNTIME_ELEMENTS_CONFIGURATION: &str = "runtimeElements";
pub const ANNOTATION_PROCESSOR_CONFIGURATION: &str = "annotationProcessor";

pub const TEST_IMPLEMENTATION_CONFIGURATION: &str = "testImplementation";
pub const TEST_COMPILE_ONLY_CONFIGURATION: &str = "testCompileOnly";
pub const TEST_RUNTIME_ONLY_CONFIGURATION: &str = "testRuntimeOnly";
pub const TEST_COMPILE_CLASSPATH_CONFIGURATION: &str = "testCompileClasspath";
pub const TEST_RUNTIME_CLASSPATH_CONFIGURATION: &str = "testRuntimeClasspath";
pub const TEST_ANNOTATION_PROCESSOR_CONFIGURATION: &str = "testAnnotationProcessor";

pub const PROCESS_RESOURCES_TASK: &str = "processResources";
pub const COMPILE_JAVA_TASK: &str = "compileJava";
pub const CLASSES_TASK: &str = "classes";
pub const JAR_TASK: &str = "jar";
pub const JAVADOC_TASK: &str = "javadoc";
pub const PROCESS_TEST_RESOURCES_TASK: &str = "processTestResources";
pub const COMPILE_TEST_JAVA_TASK: &str = "compileTestJava";
pub const TEST_CLASSES_TASK: &str = "testClasses";
pub const TEST_TASK: &str = "test";

pub const ASSEMBLE_TASK: &str = "assemble";
pub const CHECK_TASK: &str = "check";
pub const BUILD_TASK: &str = "build";
pub const BUILD_NEEDED_TASK: &str = "buildNeeded";
pub const BUILD_DEPENDENTS_TASK: &str = "buildDependents";

pub const MAIN_SOURCE_SET: &str = "main";
pub const TEST_SOURCE_SET: &str = "test";

/// Name of the component created by the Java plugin.
pub const JAVA_COMPONENT: &str = "java";
