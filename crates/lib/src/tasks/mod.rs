//! Tasks and the task graph.
//!
//! Tasks are registered per project and reference each other by name.
//! Dependencies on tasks of other projects stay unchecked until the task graph
//! is realized, at which point each unresolvable edge is reported on its own.

mod container;
mod graph;
mod types;

pub use container::TaskContainer;
pub use graph::TaskGraph;
pub use types::{MissingTaskError, Task, TaskAction, TaskDependency, TaskError, TaskHandle, TaskId};
