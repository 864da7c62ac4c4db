use std::path::PathBuf;

use clap::Args;

use crate::telemetry::{LogFormat, TelemetryConfig};

/// Configuration of the demo application.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub telemetry: TelemetryConfig,
    /// JSON directive manifest applied on top of the built-in declarations.
    pub directives_manifest: Option<PathBuf>,
    /// Number of order lookups issued concurrently by the demo.
    pub order_batch_size: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            telemetry: TelemetryConfig::default(),
            directives_manifest: None,
            order_batch_size: 3,
        }
    }
}

/// Command-line and environment overrides for [`DemoConfig`].
#[derive(Debug, Clone, Args)]
pub struct DemoArgs {
    /// Log output format.
    #[arg(long, env = "INTERPOSE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Tracing filter directive, e.g. `info,interpose=debug`. Overrides `RUST_LOG`.
    #[arg(long, env = "INTERPOSE_LOG_FILTER")]
    pub log_filter: Option<String>,

    /// Disable ANSI colours in log output.
    #[arg(long)]
    pub no_ansi: bool,

    /// Path to a JSON directive manifest.
    #[arg(long, env = "INTERPOSE_DIRECTIVES")]
    pub directives: Option<PathBuf>,

    /// Concurrent order lookups issued by the demo.
    #[arg(long, env = "INTERPOSE_ORDER_BATCH", default_value_t = 3)]
    pub order_batch: u32,
}

impl From<DemoArgs> for DemoConfig {
    fn from(args: DemoArgs) -> Self {
        Self {
            telemetry: TelemetryConfig {
                format: args.log_format,
                filter: args.log_filter,
                ansi: !args.no_ansi,
            },
            directives_manifest: args.directives,
            order_batch_size: args.order_batch,
        }
    }
}
