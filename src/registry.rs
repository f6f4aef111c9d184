//! # Variable registry
//!
//! Owns every definition, override and cached result for one test-suite block.
//!
//! ## Lifecycle
//! ```text
//! Uninitialized --setup()--> Ready --teardown()--> Uninitialized
//! Ready --setup()--> Ready                 (clears overrides and cached results)
//! Uninitialized --teardown()--> Uninitialized
//! ```
//! Reads and redefinitions are only legal while Ready. Declarations are legal
//! in either state, but a name declared during a cycle only becomes readable
//! after the next `setup()`.
//!
//! ## Usage
//! ```rust
//! use test_vars::VariableRegistry;
//!
//! let vars = VariableRegistry::new();
//! let foo = vars.define("foo", || None::<&str>).unwrap();
//! let bar = {
//!     let foo = foo.clone();
//!     vars.define("bar", move || foo.get().unwrap()).unwrap()
//! };
//!
//! vars.setup();
//! assert_eq!(bar.get().unwrap(), None);
//!
//! vars.setup();
//! foo.redefine(|| Some("foo")).unwrap();
//! assert_eq!(bar.get().unwrap(), Some("foo"));
//! ```
//!
//! ## Threading
//! A registry and its handles are single-threaded. Each suite creates its own
//! instance; nothing is shared between registries.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::RegistryConfig;
use crate::errors::{Result, TestVarsError};
use crate::handle::TestVar;
use crate::pending::Pending;
use crate::producer::Producer;

/// A stored `Producer<T>` with its value type erased.
type Definition = Rc<dyn Any>;
/// A stored `Pending<T>` with its value type erased.
type CachedResult = Rc<dyn Any>;

struct RegistryState {
    subject_name: String,
    ready: bool,
    /// Permanent declarations. Only `define` writes here.
    initial: im::HashMap<String, Definition>,
    /// Working copy for the current cycle.
    active: im::HashMap<String, Definition>,
    /// Presence of an entry means the name is memoized, whatever the value is.
    results: HashMap<String, CachedResult>,
    /// Bumped by `setup` and `teardown`.
    epoch: u64,
    /// Per-name count of redefinitions within the current epoch.
    versions: HashMap<String, u64>,
}

impl RegistryState {
    fn new(config: RegistryConfig) -> Self {
        Self {
            subject_name: config.subject_name,
            ready: false,
            initial: im::HashMap::new(),
            active: im::HashMap::new(),
            results: HashMap::new(),
            epoch: 0,
            versions: HashMap::new(),
        }
    }

    /// Identifies the definition a computation of `name` started from.
    fn stamp(&self, name: &str) -> (u64, u64) {
        (self.epoch, self.versions.get(name).copied().unwrap_or(0))
    }

    fn start_epoch(&mut self) {
        self.results.clear();
        self.versions.clear();
        self.epoch += 1;
    }
}

/// The per-suite test variable context.
///
/// Cloning yields another reference to the same state, which is how handles
/// and hook closures reach it.
#[derive(Clone)]
pub struct VariableRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl VariableRegistry {
    /// Creates an empty registry with the default subject name.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry that reserves `config.subject_name`.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(RegistryState::new(config))),
        }
    }

    /// Declares a variable computed by a synchronous closure.
    ///
    /// # Errors
    /// [`TestVarsError::DuplicateDefinition`] if `name` was declared before,
    /// regardless of readiness.
    pub fn define<T, F>(&self, name: impl Into<String>, f: F) -> Result<TestVar<T>>
    where
        T: Clone + 'static,
        F: Fn() -> T + 'static,
    {
        self.define_producer(name, Producer::from_fn(f))
    }

    /// Declares a variable computed by a closure returning a future.
    pub fn define_async<T, F, Fut>(&self, name: impl Into<String>, f: F) -> Result<TestVar<T>>
    where
        T: Clone + 'static,
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = T> + 'static,
    {
        self.define_producer(name, Producer::from_async(f))
    }

    /// Declares the thing under test. Its handle can never be redefined.
    pub fn subject<T, F>(&self, f: F) -> Result<TestVar<T>>
    where
        T: Clone + 'static,
        F: Fn() -> T + 'static,
    {
        let name = self.subject_name();
        self.define(name, f)
    }

    /// Declares the thing under test with an asynchronous producer.
    pub fn subject_async<T, F, Fut>(&self, f: F) -> Result<TestVar<T>>
    where
        T: Clone + 'static,
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = T> + 'static,
    {
        let name = self.subject_name();
        self.define_async(name, f)
    }

    /// Stores `producer` as the permanent definition of `name`.
    ///
    /// The active map is left alone: a name declared mid-cycle becomes
    /// readable on the next `setup()`.
    pub fn define_producer<T>(
        &self,
        name: impl Into<String>,
        producer: Producer<T>,
    ) -> Result<TestVar<T>>
    where
        T: Clone + 'static,
    {
        let name = name.into();
        let mut state = self.state.borrow_mut();
        if state.initial.contains_key(&name) {
            return Err(TestVarsError::DuplicateDefinition { name });
        }
        state
            .initial
            .insert(name.clone(), Rc::new(producer) as Definition);
        let is_subject = name == state.subject_name;
        debug!(name = %name, subject = is_subject, ready = state.ready, "defined test variable");
        drop(state);

        Ok(TestVar::new(self.clone(), name, is_subject))
    }

    /// Starts a fresh cycle: restores every initial definition, drops every
    /// cached result and marks the registry ready. Safe to call repeatedly.
    pub fn setup(&self) {
        let mut state = self.state.borrow_mut();
        state.active = state.initial.clone();
        state.start_epoch();
        state.ready = true;
        debug!(defined = state.initial.len(), "test variables set up");
    }

    /// Ends the cycle and declares the registry not ready. Initial
    /// definitions survive, so a later `setup()` restores them.
    pub fn teardown(&self) {
        let mut state = self.state.borrow_mut();
        state.active = im::HashMap::new();
        state.start_epoch();
        state.ready = false;
        debug!(defined = state.initial.len(), "test variables torn down");
    }

    /// Whether `setup()` has run since construction or the last `teardown()`.
    pub fn is_ready(&self) -> bool {
        self.state.borrow().ready
    }

    /// Whether `name` has a permanent declaration.
    pub fn is_defined(&self, name: &str) -> bool {
        self.state.borrow().initial.contains_key(name)
    }

    /// Whether a result for `name` is memoized in the current cycle.
    pub fn is_cached(&self, name: &str) -> bool {
        self.state.borrow().results.contains_key(name)
    }

    /// The name reserved for the subject.
    pub fn subject_name(&self) -> String {
        self.state.borrow().subject_name.clone()
    }

    /// Memoized read of `name`.
    ///
    /// No borrow is held while the producer runs, so producers may read other
    /// variables. A producer that reads itself, directly or through a cycle,
    /// recurses without bound.
    pub(crate) fn read<T>(&self, name: &str) -> Result<Pending<T>>
    where
        T: Clone + 'static,
    {
        let (producer, stamp) = {
            let state = self.state.borrow();
            if !state.ready {
                return Err(TestVarsError::NotReadyForRead { name: name.into() });
            }
            if let Some(cached) = state.results.get(name) {
                trace!(name, "test variable cache hit");
                return downcast::<Pending<T>>(name, cached);
            }
            // Declared after the last setup(); not part of this cycle.
            let Some(definition) = state.active.get(name) else {
                return Err(TestVarsError::NotReadyForRead { name: name.into() });
            };
            (downcast::<Producer<T>>(name, definition)?, state.stamp(name))
        };

        trace!(name, "test variable cache miss");
        let pending = producer.produce();

        // Skip caching if this name's definition changed while it ran.
        let mut state = self.state.borrow_mut();
        if state.stamp(name) == stamp {
            state
                .results
                .entry(name.to_string())
                .or_insert_with(|| Rc::new(pending.clone()) as CachedResult);
        }
        Ok(pending)
    }

    /// Replaces the active definition of `name` and forgets its cached result.
    pub(crate) fn redefine<T>(
        &self,
        name: &str,
        is_subject: bool,
        producer: Producer<T>,
    ) -> Result<()>
    where
        T: Clone + 'static,
    {
        if is_subject {
            return Err(TestVarsError::SubjectRedefinition);
        }
        let mut state = self.state.borrow_mut();
        if !state.ready || !state.active.contains_key(name) {
            return Err(TestVarsError::NotReadyForRedefine { name: name.into() });
        }
        let invalidated = state.results.remove(name).is_some();
        state
            .active
            .insert(name.to_string(), Rc::new(producer) as Definition);
        *state.versions.entry(name.to_string()).or_insert(0) += 1;
        debug!(name, invalidated, "redefined test variable");
        Ok(())
    }
}

impl Default for VariableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VariableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("VariableRegistry")
            .field("subject_name", &state.subject_name)
            .field("ready", &state.ready)
            .field("defined", &state.initial.len())
            .field("cached", &state.results.len())
            .finish()
    }
}

fn downcast<V: Clone + 'static>(name: &str, value: &Rc<dyn Any>) -> Result<V> {
    value
        .downcast_ref::<V>()
        .cloned()
        .ok_or_else(|| TestVarsError::TypeMismatch { name: name.into() })
}
