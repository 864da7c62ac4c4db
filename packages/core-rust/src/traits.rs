use crate::descriptor::OperationDescriptor;
use crate::directive::{DeclarationSite, DirectiveSet};
use crate::error::{MetadataError, SinkError};
use crate::resolve::resolve_directives;
use crate::sink::LogEntry;

/// Source of instrumentation directives for intercepted operations.
/// Implementations: `DirectiveRegistry` (static declarations), `CachingProvider` (memoising wrapper).
pub trait MetadataProvider: Send + Sync {
    /// The directives declared at exactly `site`, if any.
    fn declared(&self, site: &DeclarationSite<&str>)
        -> Result<Option<&DirectiveSet>, MetadataError>;

    /// Resolve every directive kind for `op` by the contract method,
    /// implementation method, implementation type priority search.
    fn resolve(&self, op: &OperationDescriptor) -> Result<DirectiveSet, MetadataError> {
        resolve_directives(self, op)
    }
}

/// Destination for structured instrumentation log entries.
/// Must accept concurrent calls from independent invocations.
pub trait LogSink: Send + Sync {
    /// Record one entry. An error means the entry was dropped.
    fn emit(&self, entry: &LogEntry<'_>) -> Result<(), SinkError>;
}
