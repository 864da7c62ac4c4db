//! The interception engine.
//!
//! Wraps one invocation of an operation: resolves its directives, emits the
//! entering line, times the call, reports success or failure to the log sink
//! and hands the original result back unchanged.
//!
//! Per-call state lives in a [`CallScope`]; the [`Interceptor`] itself only
//! holds shared, immutable collaborators and can be cloned freely.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use interpose_core::{
    templates, DirectiveSet, ErrorDirective, LogEntry, LogLevel, LogSink, MetadataProvider,
    OperationDescriptor, UNHANDLED_ERROR_MESSAGE,
};
use tokio::time::Instant;
use tracing::{info_span, Instrument, Span};

/// Error detail logged when a scope is dropped before its call completed.
pub const CANCELLED: &str = "operation cancelled before completion";

/// Error detail logged when the wrapped call panicked.
pub const PANICKED: &str = "operation panicked";

static NEXT_CALL_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// Interceptor
// ---------------------------------------------------------------------------

/// Transparent instrumentation wrapper for operation calls.
#[derive(Clone)]
pub struct Interceptor {
    provider: Arc<dyn MetadataProvider>,
    sink: Arc<dyn LogSink>,
}

impl Interceptor {
    #[must_use]
    pub fn new(provider: Arc<dyn MetadataProvider>, sink: Arc<dyn LogSink>) -> Self {
        Self { provider, sink }
    }

    /// Start intercepting a call to `op`.
    ///
    /// Resolves directives, emits the entering and timing-start lines, then
    /// starts the timer. The returned scope must be completed with the call's
    /// result; dropping it first is logged as a cancelled call.
    ///
    /// A failed directive lookup does not stop the call: it is reported as a
    /// warning and the call proceeds with no directives.
    #[must_use]
    pub fn begin(&self, op: &OperationDescriptor) -> CallScope {
        let call_id = NEXT_CALL_ID.fetch_add(1, Ordering::Relaxed);
        let operation = op.canonical_name();
        let directives = self.provider.resolve(op).unwrap_or_else(|error| {
            tracing::warn!(
                operation = %operation,
                call_id,
                error = %error,
                "directive resolution failed, running without directives"
            );
            DirectiveSet::default()
        });
        let span = info_span!("intercept", operation = %operation, call_id);

        let mut scope = CallScope {
            sink: Arc::clone(&self.sink),
            call_id,
            operation,
            directives,
            span,
            started: Instant::now(),
            finished: false,
        };

        if scope.directives.entry_exit {
            scope.emit(LogLevel::Info, templates::ENTRY, None, None, None);
        }
        if let Some(timing) = &scope.directives.timing {
            let description = timing.describe(&scope.operation);
            scope.emit(LogLevel::Debug, templates::TIMING_START, Some(description), None, None);
        }

        scope.started = Instant::now();
        scope
    }

    /// Intercept a synchronous call.
    ///
    /// # Errors
    ///
    /// Returns exactly the error `call` returned.
    pub fn invoke<T, E, F>(&self, op: &OperationDescriptor, call: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        let scope = self.begin(op);
        let result = {
            let _entered = scope.span().enter();
            call()
        };
        scope.complete(result)
    }

    /// Intercept an asynchronous call. Elapsed time covers every suspension
    /// of `call`.
    ///
    /// # Errors
    ///
    /// Returns exactly the error `call` resolved to.
    pub async fn invoke_async<T, E, Fut>(&self, op: &OperationDescriptor, call: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let scope = self.begin(op);
        let result = call.instrument(scope.span().clone()).await;
        scope.complete(result)
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// CallScope
// ---------------------------------------------------------------------------

/// State of one in-flight intercepted call.
pub struct CallScope {
    sink: Arc<dyn LogSink>,
    call_id: u64,
    operation: String,
    directives: DirectiveSet,
    span: Span,
    started: Instant,
    finished: bool,
}

impl CallScope {
    #[must_use]
    pub fn call_id(&self) -> u64 {
        self.call_id
    }

    /// Canonical `Type.method` name of the intercepted operation.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    #[must_use]
    pub fn directives(&self) -> &DirectiveSet {
        &self.directives
    }

    /// The `intercept` span the wrapped call runs in.
    #[must_use]
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Stop the timer, report the outcome and return `result` untouched.
    ///
    /// # Errors
    ///
    /// Returns `result`'s error unchanged.
    pub fn complete<T, E: Display>(mut self, result: Result<T, E>) -> Result<T, E> {
        self.finished = true;
        let elapsed_ms = self.elapsed_ms();
        match &result {
            Ok(_) => self.succeeded(elapsed_ms),
            Err(error) => self.failed(&error.to_string(), elapsed_ms),
        }
        result
    }

    fn succeeded(&self, elapsed_ms: u64) {
        if let Some(timing) = &self.directives.timing {
            let description = timing.describe(&self.operation);
            self.emit(
                LogLevel::Info,
                templates::TIMING_COMPLETE,
                Some(description),
                Some(elapsed_ms),
                None,
            );
        }
        if self.directives.entry_exit {
            self.emit(LogLevel::Info, templates::EXIT, None, None, None);
        }
    }

    fn failed(&self, error: &str, elapsed_ms: u64) {
        let message = self
            .directives
            .error
            .as_ref()
            .map_or(UNHANDLED_ERROR_MESSAGE, ErrorDirective::message_or_default);
        self.emit(
            LogLevel::Error,
            templates::ERROR,
            Some(message),
            Some(elapsed_ms),
            Some(error),
        );
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn emit(
        &self,
        level: LogLevel,
        template: &'static str,
        description: Option<&str>,
        elapsed_ms: Option<u64>,
        error: Option<&str>,
    ) {
        let entry = LogEntry {
            level,
            template,
            call_id: self.call_id,
            operation: &self.operation,
            description,
            elapsed_ms,
            error,
        };
        let _entered = self.span.enter();
        if let Err(error) = self.sink.emit(&entry) {
            tracing::warn!(
                operation = %self.operation,
                call_id = self.call_id,
                error = %error,
                "log sink dropped an entry"
            );
        }
    }
}

impl Drop for CallScope {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let reason = if std::thread::panicking() {
            PANICKED
        } else {
            CANCELLED
        };
        let elapsed_ms = self.elapsed_ms();
        self.failed(reason, elapsed_ms);
    }
}

impl std::fmt::Debug for CallScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallScope")
            .field("call_id", &self.call_id)
            .field("operation", &self.operation)
            .field("directives", &self.directives)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
