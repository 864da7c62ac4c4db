//! Wiring: directive registry, interceptor, decorated services, app.

use std::path::Path;
use std::sync::Arc;

use interpose_core::{
    CachingProvider, DirectiveManifest, DirectiveRegistry, LogSink, MetadataError,
    RegistryBuilder, TracingSink,
};

use super::app::{AppReport, AppService};
use super::calculator::{self, Calculator, CalculatorService};
use super::config::DemoConfig;
use super::decorator::Intercepted;
use super::orders::{self, OrderService, Orders};
use super::registry::ServiceRegistry;
use crate::intercept::Interceptor;

/// Registration names of the demo services.
pub mod service_names {
    pub const CALCULATOR: &str = "calculator";
    pub const ORDERS: &str = "orders";
}

/// Add every built-in declaration to `builder`.
pub fn declare_builtin(builder: &mut RegistryBuilder) {
    calculator::declare_directives(builder);
    orders::declare_directives(builder);
}

/// Build the directive registry from the built-in declarations, overlaid by
/// the manifest at `manifest` if given.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed.
pub fn build_directive_registry(
    manifest: Option<&Path>,
) -> Result<DirectiveRegistry, MetadataError> {
    let mut builder = DirectiveRegistry::builder();
    declare_builtin(&mut builder);
    if let Some(path) = manifest {
        builder.extend_from_manifest(DirectiveManifest::load(path)?);
    }
    let registry = builder.build();
    tracing::debug!(sites = registry.len(), "directive registry built");
    Ok(registry)
}

/// Register intercepted demo services under their contracts.
pub fn register_services(registry: &ServiceRegistry, interceptor: &Interceptor) {
    registry.register::<dyn Calculator>(
        service_names::CALCULATOR,
        Arc::new(Intercepted::new(CalculatorService, interceptor.clone())),
    );
    registry.register::<dyn Orders>(
        service_names::ORDERS,
        Arc::new(Intercepted::new(OrderService, interceptor.clone())),
    );
}

/// Run the demo with log entries delivered to `sink`.
///
/// # Errors
///
/// Returns an error if the manifest is invalid or the demo fails.
pub async fn run_demo_with_sink(
    config: &DemoConfig,
    sink: Arc<dyn LogSink>,
) -> anyhow::Result<AppReport> {
    let directives = build_directive_registry(config.directives_manifest.as_deref())?;
    let interceptor = Interceptor::new(Arc::new(CachingProvider::new(directives)), sink);

    let services = ServiceRegistry::new();
    register_services(&services, &interceptor);
    tracing::debug!(services = ?services.names(), "services registered");

    AppService::from_registry(&services, config.order_batch_size)?
        .run()
        .await
}

/// Run the demo, logging through `tracing`.
///
/// # Errors
///
/// See [`run_demo_with_sink`].
pub async fn run_demo(config: &DemoConfig) -> anyhow::Result<AppReport> {
    run_demo_with_sink(config, Arc::new(TracingSink)).await
}
