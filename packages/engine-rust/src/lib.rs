//! Interpose: transparent timing, entry/exit and error logging for service
//! calls, applied by an interception engine driven by declared directives.

pub mod intercept;
pub mod service;
pub mod telemetry;

pub use intercept::{CallScope, DescribedCall, InterceptLayer, InterceptService, Interceptor};
pub use service::{DemoArgs, DemoConfig, ServiceRegistry};
pub use telemetry::{init_tracing, LogFormat, TelemetryConfig};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
