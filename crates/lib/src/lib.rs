//! buildgraph-lib: build-model composition for multi-project JVM builds
//!
//! This crate provides the model a build tool assembles before any task runs:
//! - `Configuration`: named dependency buckets with inheritance and roles
//! - `Component`: publishable units wired from configurations and outputs
//! - `Settings`: the locked snapshot every project is configured against
//! - `Build`: configured projects plus the cross-project task edges between them
//! - `ProblemLocationResolver`: maps a call stack to a user-facing location

pub mod build;
pub mod component;
pub mod configuration;
pub mod consts;
pub mod description;
pub mod eval;
pub mod linker;
pub mod plugins;
pub mod problems;
pub mod project;
pub mod settings;
pub mod tasks;
pub mod types;
