//! Handles returned by `define` and `subject`.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use crate::errors::{Result, TestVarsError};
use crate::pending::Pending;
use crate::producer::Producer;
use crate::registry::VariableRegistry;

/// A readable, redefinable test variable, bound to one name for its lifetime.
pub struct TestVar<T> {
    registry: VariableRegistry,
    name: String,
    is_subject: bool,
    _value: PhantomData<fn() -> T>,
}

impl<T: Clone + 'static> TestVar<T> {
    pub(crate) fn new(registry: VariableRegistry, name: String, is_subject: bool) -> Self {
        Self {
            registry,
            name,
            is_subject,
            _value: PhantomData,
        }
    }

    /// The name this handle is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this handle is bound to the reserved subject name.
    pub fn is_subject(&self) -> bool {
        self.is_subject
    }

    /// Memoized read.
    ///
    /// The first read after an invalidation invokes the active producer and
    /// caches what it returns; later reads hand back the same [`Pending`].
    ///
    /// # Errors
    /// [`TestVarsError::NotReadyForRead`] before `setup()`, after `teardown()`,
    /// or for a name declared after the last `setup()`.
    pub fn read(&self) -> Result<Pending<T>> {
        self.registry.read(&self.name)
    }

    /// Reads and resolves the value without blocking.
    ///
    /// # Errors
    /// Everything [`TestVar::read`] returns, plus [`TestVarsError::StillPending`]
    /// when an asynchronous producer has not settled yet.
    pub fn get(&self) -> Result<T> {
        self.read()?
            .try_resolve()
            .ok_or_else(|| TestVarsError::StillPending {
                name: self.name.clone(),
            })
    }

    /// Replaces this variable's definition until the next `setup()`.
    ///
    /// # Errors
    /// [`TestVarsError::SubjectRedefinition`] for the subject, in any state.
    /// Otherwise [`TestVarsError::NotReadyForRedefine`] outside a setup cycle.
    pub fn redefine<F>(&self, f: F) -> Result<()>
    where
        F: Fn() -> T + 'static,
    {
        self.redefine_with(Producer::from_fn(f))
    }

    /// Like [`TestVar::redefine`], with a closure returning a future.
    pub fn redefine_async<F, Fut>(&self, f: F) -> Result<()>
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = T> + 'static,
    {
        self.redefine_with(Producer::from_async(f))
    }

    /// Like [`TestVar::redefine`], with an already built [`Producer`].
    pub fn redefine_with(&self, producer: Producer<T>) -> Result<()> {
        self.registry.redefine(&self.name, self.is_subject, producer)
    }
}

impl<T> Clone for TestVar<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            name: self.name.clone(),
            is_subject: self.is_subject,
            _value: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TestVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestVar")
            .field("name", &self.name)
            .field("subject", &self.is_subject)
            .finish()
    }
}
