//! The value every read returns.
//!
//! Synchronous producers resolve immediately; asynchronous ones resolve when
//! their future does. Either way the registry caches the `Pending` itself, so
//! every reader of a name within one setup cycle observes the same computation.

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A possibly unresolved test variable value.
///
/// Cloning is cheap and every clone resolves to the same output.
pub struct Pending<T: Clone> {
    inner: Shared<LocalBoxFuture<'static, T>>,
}

impl<T: Clone + 'static> Pending<T> {
    /// A value that is already resolved.
    pub fn ready(value: T) -> Self {
        Self::from_future(futures::future::ready(value))
    }

    /// Wraps a future. It is not polled until someone awaits or inspects it.
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = T> + 'static,
    {
        Self {
            inner: future.boxed_local().shared(),
        }
    }

    /// Polls once and returns the value if it has settled.
    pub fn try_resolve(&self) -> Option<T> {
        self.inner.clone().now_or_never()
    }

    /// Returns the value only if an earlier poll already produced it.
    pub fn peek(&self) -> Option<&T> {
        self.inner.peek()
    }

    /// Whether both handles share one underlying computation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl<T: Clone> Clone for Pending<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> Future for Pending<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

impl<T: Clone + 'static> fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("resolved", &self.peek().is_some())
            .finish()
    }
}
