//! Interception of operation calls.
//!
//! - [`engine`]: the [`Interceptor`] and its per-call [`CallScope`]
//! - [`layer`]: tower middleware routing service requests through the engine

pub mod engine;
pub mod layer;

pub use engine::{CallScope, Interceptor, CANCELLED, PANICKED};
pub use layer::{DescribedCall, InterceptLayer, InterceptService};
