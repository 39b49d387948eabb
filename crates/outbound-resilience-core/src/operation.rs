//! The deferred computation wrapped by proxies.

use crate::error::{BoxError, ResilienceError};
use futures::future::{BoxFuture, FutureExt, TryFutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type OperationFn<T> = dyn Fn() -> BoxFuture<'static, Result<T, ResilienceError>> + Send + Sync;

/// A zero-argument asynchronous computation that may be invoked many times.
///
/// Proxies never look inside an operation; they only observe whether each
/// invocation succeeded, failed, or how long it took. Cloning is cheap, which
/// lets a retry proxy or a pipeline stage hand the same operation on repeatedly.
pub struct Operation<T> {
    f: Arc<OperationFn<T>>,
}

impl<T: Send + 'static> Operation<T> {
    /// Wraps a closure whose futures already fail with [`ResilienceError`].
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ResilienceError>> + Send + 'static,
    {
        Self {
            f: Arc::new(move || f().boxed()),
        }
    }

    /// Wraps a transport function; its failures become [`ResilienceError::Operation`].
    pub fn from_transport<F, Fut, E>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::new(move || f().map_err(ResilienceError::operation))
    }
}

impl<T> Operation<T> {
    /// Starts one invocation.
    pub fn call(&self) -> BoxFuture<'static, Result<T, ResilienceError>> {
        (self.f)()
    }
}

impl<T> Clone for Operation<T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation").finish_non_exhaustive()
    }
}
