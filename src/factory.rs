//! Entry point for test suites.
//!
//! Hands out the four capabilities a suite needs (`define`, `setup`, `subject`
//! and `teardown`, plus their async forms) without exposing the registry's
//! internals.

use std::future::Future;

use crate::config::RegistryConfig;
use crate::errors::Result;
use crate::handle::TestVar;
use crate::registry::VariableRegistry;

/// Capabilities bound to one freshly created registry.
#[derive(Clone, Debug, Default)]
pub struct TestVars {
    registry: VariableRegistry,
}

/// Creates the test variables for one top-level suite block.
///
/// ```rust
/// let vars = test_vars::create_test_vars();
/// let greeting = vars.define("greeting", || "hello").unwrap();
/// let subject = {
///     let greeting = greeting.clone();
///     vars.subject(move || greeting.get().unwrap().len()).unwrap()
/// };
///
/// vars.setup();
/// assert_eq!(subject.get().unwrap(), 5);
/// ```
pub fn create_test_vars() -> TestVars {
    create_test_vars_with(RegistryConfig::default())
}

/// Like [`create_test_vars`], with an explicit configuration.
pub fn create_test_vars_with(config: RegistryConfig) -> TestVars {
    TestVars {
        registry: VariableRegistry::with_config(config),
    }
}

impl TestVars {
    /// Declares a variable. See [`VariableRegistry::define`].
    pub fn define<T, F>(&self, name: impl Into<String>, f: F) -> Result<TestVar<T>>
    where
        T: Clone + 'static,
        F: Fn() -> T + 'static,
    {
        self.registry.define(name, f)
    }

    /// Declares a variable with an asynchronous producer.
    pub fn define_async<T, F, Fut>(&self, name: impl Into<String>, f: F) -> Result<TestVar<T>>
    where
        T: Clone + 'static,
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = T> + 'static,
    {
        self.registry.define_async(name, f)
    }

    /// Declares the subject, which can never be redefined.
    pub fn subject<T, F>(&self, f: F) -> Result<TestVar<T>>
    where
        T: Clone + 'static,
        F: Fn() -> T + 'static,
    {
        self.registry.subject(f)
    }

    /// Declares the subject with an asynchronous producer.
    pub fn subject_async<T, F, Fut>(&self, f: F) -> Result<TestVar<T>>
    where
        T: Clone + 'static,
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = T> + 'static,
    {
        self.registry.subject_async(f)
    }

    /// Resets overrides and cached values and marks the variables ready.
    pub fn setup(&self) {
        self.registry.setup()
    }

    /// Clears cached values and marks the variables not ready.
    pub fn teardown(&self) {
        self.registry.teardown()
    }
}
