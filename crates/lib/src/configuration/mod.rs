//! Dependency configurations.
//!
//! A configuration is a named bucket of dependency declarations. Configurations
//! inherit from each other ("extends from") and carry a role that controls
//! whether they may be resolved, consumed by other projects, or only declared on.

mod registry;
mod types;

pub use registry::ConfigurationRegistry;
pub use types::{Configuration, ConfigurationError, ConfigurationHandle, ConfigurationRole, DependencyRef};
