//! Middleware and handler traits.
//!
//! A stage receives the [`Request`] and a [`Next`] continuation. Calling
//! `next.run(request)` hands control to the following stage (or the core
//! handler); returning without calling it short-circuits the chain.
//!
//! ```
//! use powatools_apigateway::middleware::{BoxFuture, Middleware, Next};
//! use powatools_apigateway::{HandlerResult, Request};
//!
//! struct Trace;
//!
//! impl<T: Send + 'static> Middleware<T> for Trace {
//!     fn name(&self) -> &'static str {
//!         "trace"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         request: Request,
//!         next: Next<'a, T>,
//!     ) -> BoxFuture<'a, HandlerResult<T>> {
//!         Box::pin(async move {
//!             tracing::debug!("before");
//!             let result = next.run(request).await;
//!             tracing::debug!(ok = result.is_ok(), "after");
//!             result
//!         })
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{Failure, HandlerError, HandlerResult};
use crate::event::Request;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A type-erased middleware stage.
pub type BoxedMiddleware<T> = Arc<dyn Middleware<T>>;

/// A stage in front of the core handler.
///
/// Stages are generic over the handler's success type `T` but never look at
/// it; they either forward the request or reject it.
pub trait Middleware<T>: Send + Sync {
    /// Short stage name used in logs.
    fn name(&self) -> &'static str;

    /// Process the request, usually by calling `next.run` exactly once.
    fn process<'a>(
        &'a self,
        request: Request,
        next: Next<'a, T>,
    ) -> BoxFuture<'a, HandlerResult<T>>;
}

/// The core handler at the end of the chain.
///
/// Implemented for every `Fn(Request) -> impl Future<Output = HandlerResult<T>>`,
/// so plain async functions and closures can be used directly.
pub trait Handler<T>: Send + Sync {
    /// Run the handler.
    fn call(&self, request: Request) -> BoxFuture<'_, HandlerResult<T>>;
}

impl<T, F, Fut> Handler<T> for F
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult<T>> + Send + 'static,
{
    fn call(&self, request: Request) -> BoxFuture<'_, HandlerResult<T>> {
        Box::pin(self(request))
    }
}

/// Continuation to the rest of the chain.
///
/// Consumed by [`Next::run`], so a stage cannot invoke the remainder twice.
pub struct Next<'a, T> {
    stages: &'a [BoxedMiddleware<T>],
    handler: &'a dyn Handler<T>,
}

impl<'a, T> Next<'a, T> {
    /// Start a chain over `stages`, ending at `handler`.
    pub(crate) fn new(stages: &'a [BoxedMiddleware<T>], handler: &'a dyn Handler<T>) -> Self {
        Self { stages, handler }
    }

    /// Invoke the next stage, or the handler once the stages are exhausted.
    pub fn run(self, request: Request) -> BoxFuture<'a, HandlerResult<T>> {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.process(request, Next::new(rest, self.handler)),
            None => self.handler.call(request),
        }
    }

    /// Number of stages still ahead of the handler.
    pub fn remaining(&self) -> usize {
        self.stages.len()
    }
}

/// An already-completed rejection, for stages that short-circuit.
pub fn reject<'a, T: Send + 'a>(failure: Failure) -> BoxFuture<'a, HandlerResult<T>> {
    Box::pin(std::future::ready(Err(HandlerError::Rejected(failure))))
}
