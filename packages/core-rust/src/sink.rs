//! Structured log entries and the sinks that receive them.
//!
//! - [`TracingSink`]: forwards entries as `tracing` events under the
//!   `interpose` target
//! - [`MemorySink`]: keeps owned copies of entries for inspection

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::SinkError;
use crate::traits::LogSink;

/// Message templates. Placeholders are filled by [`LogEntry::render`].
pub mod templates {
    pub const ENTRY: &str = "[ENTRY] Entering {MethodName}";
    pub const TIMING_START: &str = "[TIME] Starting {Description}";
    pub const TIMING_COMPLETE: &str = "[TIME] Completed {Description} in {ElapsedMs}ms";
    pub const EXIT: &str = "[EXIT] Exiting {MethodName}";
    pub const ERROR: &str = "[ERROR] {ErrorMessage} in {MethodName} after {ElapsedMs}ms";
}

/// Tracing target used for every forwarded entry.
pub const LOG_TARGET: &str = "interpose";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Error,
}

/// One structured log entry produced by an intercepted call.
///
/// Borrowed from the call scope that emits it; sinks that keep entries
/// convert them with [`LogEntry::to_captured`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEntry<'a> {
    pub level: LogLevel,
    pub template: &'static str,
    /// Process-unique id of the invocation this entry belongs to.
    pub call_id: u64,
    /// Canonical `Type.method` name.
    pub operation: &'a str,
    /// Timing description or error message.
    pub description: Option<&'a str>,
    pub elapsed_ms: Option<u64>,
    /// Display text of the underlying failure.
    pub error: Option<&'a str>,
}

impl LogEntry<'_> {
    /// Human-readable message with every known placeholder filled in.
    #[must_use]
    pub fn render(&self) -> String {
        let mut message = self.template.replace("{MethodName}", self.operation);
        if let Some(description) = self.description {
            message = message
                .replace("{Description}", description)
                .replace("{ErrorMessage}", description);
        }
        if let Some(elapsed_ms) = self.elapsed_ms {
            message = message.replace("{ElapsedMs}", &elapsed_ms.to_string());
        }
        message
    }

    #[must_use]
    pub fn to_captured(&self) -> CapturedEntry {
        CapturedEntry {
            level: self.level,
            template: self.template,
            call_id: self.call_id,
            operation: self.operation.to_string(),
            description: self.description.map(ToString::to_string),
            elapsed_ms: self.elapsed_ms,
            error: self.error.map(ToString::to_string),
            message: self.render(),
        }
    }
}

// ---------------------------------------------------------------------------
// TracingSink
// ---------------------------------------------------------------------------

/// Forwards entries to the `tracing` dispatcher with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

macro_rules! forward_event {
    ($level:expr, $entry:expr) => {
        tracing::event!(
            target: LOG_TARGET,
            $level,
            call_id = $entry.call_id,
            operation = $entry.operation,
            description = $entry.description,
            elapsed_ms = $entry.elapsed_ms,
            error = $entry.error,
            "{}",
            $entry.render()
        )
    };
}

impl LogSink for TracingSink {
    fn emit(&self, entry: &LogEntry<'_>) -> Result<(), SinkError> {
        match entry.level {
            LogLevel::Debug => forward_event!(tracing::Level::DEBUG, entry),
            LogLevel::Info => forward_event!(tracing::Level::INFO, entry),
            LogLevel::Error => forward_event!(tracing::Level::ERROR, entry),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// Owned copy of a [`LogEntry`] kept by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEntry {
    pub level: LogLevel,
    pub template: &'static str,
    pub call_id: u64,
    pub operation: String,
    pub description: Option<String>,
    pub elapsed_ms: Option<u64>,
    pub error: Option<String>,
    /// Rendered message.
    pub message: String,
}

/// In-memory sink. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<CapturedEntry>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry captured so far, in emission order.
    #[must_use]
    pub fn entries(&self) -> Vec<CapturedEntry> {
        self.entries.lock().clone()
    }

    /// Entries belonging to one invocation, in emission order.
    #[must_use]
    pub fn for_call(&self, call_id: u64) -> Vec<CapturedEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.call_id == call_id)
            .cloned()
            .collect()
    }

    /// Rendered messages, in emission order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.message.clone()).collect()
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEntry) -> bool,
    {
        self.entries.lock().iter().filter(|e| predicate(e)).count()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn emit(&self, entry: &LogEntry<'_>) -> Result<(), SinkError> {
        self.entries.lock().push(entry.to_captured());
        Ok(())
    }
}
