//! Locating the user-relevant origin of a reported problem.
//!
//! Problems are reported with the call stack that raised them. Most of that
//! stack belongs to the build tool itself; the resolver picks the first frame
//! that points into the user's build scripts.

mod location;

pub use location::{FrameFilter, InternalFrameFilter, Location, ProblemLocationResolver, ScriptFrameFilter, StackFrame};
