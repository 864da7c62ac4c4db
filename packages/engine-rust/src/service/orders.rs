//! Orders contract and its plain implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use interpose_core::{DirectiveSet, ErrorDirective, Implementation, RegistryBuilder, Timing};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u32,
    pub customer_name: String,
    /// Order total in cents.
    pub amount_cents: u64,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order {} for {} ({}.{:02})",
            self.id,
            self.customer_name,
            self.amount_cents / 100,
            self.amount_cents % 100
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("order {id} has no amount")]
    InvalidAmount { id: u32 },
}

#[async_trait]
pub trait Orders: Send + Sync {
    /// Fetch an order by id after ~150ms.
    ///
    /// # Errors
    ///
    /// The demo store never fails a lookup; other stores may.
    async fn get_order(&self, id: u32) -> Result<Order, OrderError>;

    /// Process an order after ~300ms.
    ///
    /// # Errors
    ///
    /// [`OrderError::InvalidAmount`] for a zero-amount order.
    async fn process_order(&self, order: &Order) -> Result<(), OrderError>;
}

pub(crate) const GET_DELAY: Duration = Duration::from_millis(150);
pub(crate) const PROCESS_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderService;

impl Implementation for OrderService {
    const NAME: &'static str = "OrderService";
}

#[async_trait]
impl Orders for OrderService {
    async fn get_order(&self, id: u32) -> Result<Order, OrderError> {
        tokio::time::sleep(GET_DELAY).await;
        Ok(Order {
            id,
            customer_name: "John Doe".to_string(),
            amount_cents: 9_999,
        })
    }

    async fn process_order(&self, order: &Order) -> Result<(), OrderError> {
        tokio::time::sleep(PROCESS_DELAY).await;
        if order.amount_cents == 0 {
            return Err(OrderError::InvalidAmount { id: order.id });
        }
        tracing::info!(order_id = order.id, "processing {order}");
        Ok(())
    }
}

/// Instrumentation declared for [`OrderService`].
pub fn declare_directives(builder: &mut RegistryBuilder) {
    let name = OrderService::NAME;
    builder
        .implementation_method(
            name,
            "get_order",
            &["u32"],
            DirectiveSet::new()
                .with_timing(Timing::new("Retrieving order"))
                .with_entry_exit(),
        )
        .implementation_method(
            name,
            "process_order",
            &["&Order"],
            DirectiveSet::new()
                .with_timing(Timing::new("Processing order"))
                .with_error(ErrorDirective::new("Order processing failed")),
        );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn get_order_returns_demo_order() {
        let order = OrderService.get_order(123).await.unwrap();
        assert_eq!(order.id, 123);
        assert_eq!(order.customer_name, "John Doe");
        assert_eq!(order.to_string(), "Order 123 for John Doe (99.99)");
    }

    #[tokio::test(start_paused = true)]
    async fn process_order_rejects_empty_amount() {
        let mut order = OrderService.get_order(9).await.unwrap();
        assert!(OrderService.process_order(&order).await.is_ok());

        order.amount_cents = 0;
        assert_eq!(
            OrderService.process_order(&order).await,
            Err(OrderError::InvalidAmount { id: 9 })
        );
    }

    #[test]
    fn order_round_trips_through_json() {
        let order = Order {
            id: 1,
            customer_name: "Ada".to_string(),
            amount_cents: 5,
        };
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(json, r#"{"id":1,"customer_name":"Ada","amount_cents":5}"#);
        assert_eq!(serde_json::from_str::<Order>(&json).unwrap(), order);
    }
}
