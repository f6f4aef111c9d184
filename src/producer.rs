//! Zero-argument producers behind every definition.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use crate::pending::Pending;

/// A type-erased producer of `T`.
///
/// The wrapped closure runs again on every invocation, so installing the same
/// producer in several places never aliases a previously computed value.
pub struct Producer<T: Clone> {
    make: Rc<dyn Fn() -> Pending<T>>,
}

impl<T: Clone + 'static> Producer<T> {
    /// A producer backed by a synchronous closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self {
            make: Rc::new(move || Pending::ready(f())),
        }
    }

    /// A producer backed by a closure returning a future.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = T> + 'static,
    {
        Self {
            make: Rc::new(move || Pending::from_future(f())),
        }
    }

    pub(crate) fn produce(&self) -> Pending<T> {
        (self.make)()
    }
}

impl<T: Clone> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            make: Rc::clone(&self.make),
        }
    }
}

impl<T: Clone> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Producer(..)")
    }
}
