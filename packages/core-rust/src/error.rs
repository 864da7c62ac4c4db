use std::path::PathBuf;

/// Errors raised while looking up or loading directive metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("directive lookup failed at {site}: {reason}")]
    Lookup { site: String, reason: String },
    #[error("invalid directive manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("failed to read directive manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a log sink when it cannot accept an entry.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("log sink unavailable: {0}")]
    Unavailable(String),
}
