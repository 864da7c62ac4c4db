//! Interpose Core: operation descriptors, instrumentation directives, the
//! directive registry with its resolution policy, and structured log sinks.

pub mod descriptor;
pub mod directive;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod resolve;
pub mod sink;
pub mod traits;

pub use descriptor::{Implementation, OperationDescriptor};
pub use directive::{
    DeclarationSite, DirectiveSet, ErrorDirective, Timing, DEFAULT_ERROR_MESSAGE,
    UNHANDLED_ERROR_MESSAGE,
};
pub use error::{MetadataError, SinkError};
pub use manifest::{DirectiveManifest, ManifestEntry};
pub use registry::{DirectiveRegistry, RegistryBuilder};
pub use resolve::{resolve_directives, CachingProvider};
pub use sink::{templates, CapturedEntry, LogEntry, LogLevel, MemorySink, TracingSink};
pub use traits::{LogSink, MetadataProvider};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
