//! Demo services and the glue that puts them behind the interceptor.
//!
//! 1. **Contracts** (`calculator`, `orders`): traits plus plain implementations
//!    and their compile-time directive declarations
//! 2. **Decorator** (`decorator`): `Intercepted<S>` routes every contract call
//!    through the [`Interceptor`](crate::intercept::Interceptor)
//! 3. **Registry** (`registry`): contract-keyed service lookup
//! 4. **Composition** (`compose`, `app`, `config`): wiring and the demo run

pub mod app;
pub mod calculator;
pub mod compose;
pub mod config;
pub mod decorator;
pub mod orders;
pub mod registry;

pub use app::{AppReport, AppService};
pub use calculator::{CalcError, Calculator, CalculatorService};
pub use compose::{
    build_directive_registry, declare_builtin, register_services, run_demo, run_demo_with_sink,
    service_names,
};
pub use config::{DemoArgs, DemoConfig};
pub use decorator::Intercepted;
pub use orders::{Order, OrderError, OrderService, Orders};
pub use registry::ServiceRegistry;
