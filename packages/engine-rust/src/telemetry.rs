//! Tracing subscriber initialisation for binaries and examples.

use clap::ValueEnum;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Filter used when neither the configuration nor `RUST_LOG` provides one.
pub const DEFAULT_FILTER: &str = "info,interpose=debug";

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Multi-line, human-oriented.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// Newline-delimited JSON with structured fields.
    Json,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// Explicit filter directive. Takes precedence over `RUST_LOG`.
    pub filter: Option<String>,
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Compact,
            filter: None,
            ansi: true,
        }
    }
}

/// Resolve the effective filter: configured directive, then `RUST_LOG`,
/// then [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Returns an error if the configured directive does not parse.
pub fn build_filter(config: &TelemetryConfig) -> anyhow::Result<EnvFilter> {
    match &config.filter {
        Some(directive) => Ok(EnvFilter::try_new(directive)?),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init_tracing(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter = build_filter(config)?;

    let fmt_layer = fmt::layer().with_ansi(config.ansi).with_target(true);
    let fmt_layer = match config.format {
        LogFormat::Pretty => fmt_layer.pretty().boxed(),
        LogFormat::Compact => fmt_layer.compact().boxed(),
        LogFormat::Json => fmt_layer.json().with_current_span(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(format = ?config.format, "tracing initialised");
    Ok(())
}
