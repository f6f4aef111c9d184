//! Lazily evaluated, memoized, overridable test variables.
//!
//! A suite declares its variables once, calls `setup()` before every test,
//! and varies inputs per scope with `redefine` from nested before-each hooks.
//! Every variable is computed at most once per test.

pub use crate::config::{RegistryConfig, DEFAULT_SUBJECT_NAME};
pub use crate::errors::{ErrorKind, Result, TestVarsError};
pub use crate::factory::{create_test_vars, create_test_vars_with, TestVars};
pub use crate::handle::TestVar;
pub use crate::pending::Pending;
pub use crate::producer::Producer;
pub use crate::registry::VariableRegistry;

pub mod config;
pub mod errors;
pub mod factory;
pub mod handle;
pub mod logging;
pub mod pending;
pub mod producer;
pub mod registry;
