use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One frame of a call stack, most recent call first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackFrame {
  pub class_name: String,
  pub method_name: String,
  #[serde(default)]
  pub file_name: Option<String>,
  #[serde(default)]
  pub line: Option<u32>,
}

impl StackFrame {
  pub fn new(class_name: &str, method_name: &str) -> Self {
    Self {
      class_name: class_name.to_string(),
      method_name: method_name.to_string(),
      file_name: None,
      line: None,
    }
  }

  pub fn at(mut self, file_name: &str, line: u32) -> Self {
    self.file_name = Some(file_name.to_string());
    self.line = Some(line);
    self
  }
}

/// Where a problem happened, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
  pub source: String,
  pub line: Option<u32>,
}

impl From<&StackFrame> for Location {
  fn from(frame: &StackFrame) -> Self {
    let source = frame
      .file_name
      .clone()
      .unwrap_or_else(|| format!("{}.{}", frame.class_name, frame.method_name));
    Self {
      source,
      line: frame.line,
    }
  }
}

impl fmt::Display for Location {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.line {
      Some(line) => write!(f, "{}: line {}", self.source, line),
      None => f.write_str(&self.source),
    }
  }
}

/// Decides whether a frame may be shown as a problem's location.
pub trait FrameFilter: Send + Sync {
  fn accepts(&self, frame: &StackFrame) -> bool;
}

impl<F> FrameFilter for F
where
  F: Fn(&StackFrame) -> bool + Send + Sync,
{
  fn accepts(&self, frame: &StackFrame) -> bool {
    self(frame)
  }
}

/// Rejects frames whose class belongs to the build tool or the runtime.
#[derive(Debug, Clone)]
pub struct InternalFrameFilter {
  prefixes: Vec<String>,
}

impl Default for InternalFrameFilter {
  fn default() -> Self {
    Self::new(["org.gradle.", "java.", "javax.", "jdk.", "sun.", "com.sun.", "kotlin.", "groovy.", "org.codehaus.groovy."])
  }
}

impl InternalFrameFilter {
  pub fn new<I, S>(prefixes: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      prefixes: prefixes.into_iter().map(Into::into).collect(),
    }
  }
}

impl FrameFilter for InternalFrameFilter {
  fn accepts(&self, frame: &StackFrame) -> bool {
    !self.prefixes.iter().any(|p| frame.class_name.starts_with(p.as_str()))
  }
}

/// Accepts only frames that come from a build script.
#[derive(Debug, Clone)]
pub struct ScriptFrameFilter {
  extensions: Vec<String>,
}

impl Default for ScriptFrameFilter {
  fn default() -> Self {
    Self {
      extensions: vec![".gradle".to_string(), ".gradle.kts".to_string()],
    }
  }
}

impl FrameFilter for ScriptFrameFilter {
  fn accepts(&self, frame: &StackFrame) -> bool {
    frame
      .file_name
      .as_deref()
      .is_some_and(|file| self.extensions.iter().any(|ext| file.ends_with(ext.as_str())))
  }
}

/// Finds the first user-relevant frame of a stack.
///
/// Holds no mutable state; a single resolver can be shared across threads.
#[derive(Clone)]
pub struct ProblemLocationResolver {
  filters: Vec<Arc<dyn FrameFilter>>,
}

impl fmt::Debug for ProblemLocationResolver {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProblemLocationResolver")
      .field("filters", &self.filters.len())
      .finish()
  }
}

impl Default for ProblemLocationResolver {
  fn default() -> Self {
    Self::new(vec![
      Arc::new(InternalFrameFilter::default()),
      Arc::new(ScriptFrameFilter::default()),
    ])
  }
}

impl ProblemLocationResolver {
  /// A resolver accepting frames every filter accepts.
  pub fn new(filters: Vec<Arc<dyn FrameFilter>>) -> Self {
    Self { filters }
  }

  /// The location of the first frame, top first, that every filter accepts.
  ///
  /// `None` means the location is unknown; it is not an error.
  pub fn locate(&self, frames: &[StackFrame]) -> Option<Location> {
    frames
      .iter()
      .find(|frame| self.filters.iter().all(|filter| filter.accepts(frame)))
      .map(Location::from)
  }
}
