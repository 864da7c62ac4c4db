//! Tower middleware that routes service calls through the [`Interceptor`].
//!
//! Any `tower::Service` whose request type can name its operation (via
//! [`DescribedCall`]) can be wrapped. Responses and errors pass through
//! untouched.

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use interpose_core::OperationDescriptor;
use tower::{Layer, Service};
use tracing::Instrument;

use super::engine::Interceptor;

/// A request that knows which operation it invokes.
pub trait DescribedCall {
    fn descriptor(&self) -> &OperationDescriptor;
}

// ---------------------------------------------------------------------------
// InterceptLayer
// ---------------------------------------------------------------------------

/// Tower layer applying timing, entry/exit and error logging to each call.
#[derive(Debug, Clone)]
pub struct InterceptLayer {
    interceptor: Interceptor,
}

impl InterceptLayer {
    #[must_use]
    pub fn new(interceptor: Interceptor) -> Self {
        Self { interceptor }
    }
}

impl<S> Layer<S> for InterceptLayer {
    type Service = InterceptService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InterceptService {
            inner,
            interceptor: self.interceptor.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// InterceptService
// ---------------------------------------------------------------------------

/// Service wrapper produced by [`InterceptLayer`].
#[derive(Debug, Clone)]
pub struct InterceptService<S> {
    inner: S,
    interceptor: Interceptor,
}

impl<S, R> Service<R> for InterceptService<S>
where
    R: DescribedCall,
    S: Service<R> + Send,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: Display + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: R) -> Self::Future {
        let scope = self.interceptor.begin(request.descriptor());
        let span = scope.span().clone();

        let fut = {
            let _entered = span.enter();
            self.inner.call(request)
        };

        Box::pin(async move { scope.complete(fut.await) }.instrument(span))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
