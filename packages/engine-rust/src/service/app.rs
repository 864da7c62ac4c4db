//! The demo application: drives the intercepted services the way a caller
//! would, without knowing they are intercepted.

use std::sync::Arc;

use futures_util::future::join_all;

use super::calculator::{CalcError, Calculator};
use super::orders::{Order, Orders};
use super::registry::ServiceRegistry;

/// What one demo run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppReport {
    pub sum: i32,
    pub processed: String,
    pub order: Order,
    /// Ids returned by the concurrent lookup batch, in request order.
    pub batch: Vec<u32>,
    /// Whether the division by zero surfaced as [`CalcError::DivideByZero`].
    pub division_handled: bool,
}

pub struct AppService {
    calculator: Arc<dyn Calculator>,
    orders: Arc<dyn Orders>,
    batch_size: u32,
}

impl AppService {
    #[must_use]
    pub fn new(calculator: Arc<dyn Calculator>, orders: Arc<dyn Orders>, batch_size: u32) -> Self {
        Self {
            calculator,
            orders,
            batch_size,
        }
    }

    /// Resolve both contracts from `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if either contract is not registered.
    pub fn from_registry(registry: &ServiceRegistry, batch_size: u32) -> anyhow::Result<Self> {
        Ok(Self::new(
            registry.require::<dyn Calculator>()?,
            registry.require::<dyn Orders>()?,
            batch_size,
        ))
    }

    /// Run the demo sequence.
    ///
    /// # Errors
    ///
    /// Returns the first unexpected service failure. The division by zero is
    /// expected and handled.
    pub async fn run(&self) -> anyhow::Result<AppReport> {
        tracing::info!("starting application service");

        tracing::info!("=== calculator service ===");
        let calculator = Arc::clone(&self.calculator);
        let sum = tokio::task::spawn_blocking(move || calculator.add(10, 5)).await?;
        tracing::info!(sum, "sum result");

        let processed = self.calculator.process_data("hello world").await?;
        tracing::info!(%processed, "processed data");

        tracing::info!("=== order service ===");
        let order = self.orders.get_order(123).await?;
        tracing::info!(order_id = order.id, "retrieved order");
        self.orders.process_order(&order).await?;

        let lookups = (1..=self.batch_size).map(|id| self.orders.get_order(id));
        let batch = join_all(lookups)
            .await
            .into_iter()
            .map(|fetched| fetched.map(|order| order.id))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(count = batch.len(), "retrieved order batch");

        tracing::info!("=== error handling ===");
        let calculator = Arc::clone(&self.calculator);
        let division_handled = match tokio::task::spawn_blocking(move || calculator.divide(10, 0))
            .await?
        {
            Err(CalcError::DivideByZero) => {
                tracing::info!("division by zero was handled");
                true
            }
            Err(other) => return Err(other.into()),
            Ok(quotient) => {
                tracing::warn!(quotient, "division by zero succeeded unexpectedly");
                false
            }
        };

        Ok(AppReport {
            sum,
            processed,
            order,
            batch,
            division_handled,
        })
    }
}

impl std::fmt::Debug for AppService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppService")
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}
