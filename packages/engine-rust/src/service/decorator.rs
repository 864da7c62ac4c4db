//! Explicit decorators routing contract calls through the [`Interceptor`].
//!
//! `Intercepted<S>` implements each demo contract for any `S` that implements
//! it, so callers holding an `Arc<dyn Calculator>` cannot tell the two apart.

use std::convert::Infallible;

use async_trait::async_trait;
use interpose_core::{operation, Implementation};

use super::calculator::{CalcError, Calculator};
use super::orders::{Order, OrderError, Orders};
use crate::intercept::Interceptor;

/// A contract implementation whose every method is intercepted.
#[derive(Debug, Clone)]
pub struct Intercepted<S> {
    inner: S,
    interceptor: Interceptor,
}

impl<S> Intercepted<S> {
    #[must_use]
    pub fn new(inner: S, interceptor: Interceptor) -> Self {
        Self { inner, interceptor }
    }

    /// The undecorated implementation.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S> Calculator for Intercepted<S>
where
    S: Calculator + Implementation,
{
    fn add(&self, a: i32, b: i32) -> i32 {
        let op = operation!(Calculator for S::NAME, add(i32, i32));
        match self
            .interceptor
            .invoke(&op, || Ok::<_, Infallible>(self.inner.add(a, b)))
        {
            Ok(sum) => sum,
            Err(never) => match never {},
        }
    }

    fn divide(&self, a: i32, b: i32) -> Result<i32, CalcError> {
        let op = operation!(Calculator for S::NAME, divide(i32, i32));
        self.interceptor.invoke(&op, || self.inner.divide(a, b))
    }

    async fn process_data(&self, data: &str) -> Result<String, CalcError> {
        let op = operation!(Calculator for S::NAME, process_data(&str));
        self.interceptor
            .invoke_async(&op, self.inner.process_data(data))
            .await
    }
}

#[async_trait]
impl<S> Orders for Intercepted<S>
where
    S: Orders + Implementation,
{
    async fn get_order(&self, id: u32) -> Result<Order, OrderError> {
        let op = operation!(Orders for S::NAME, get_order(u32));
        self.interceptor
            .invoke_async(&op, self.inner.get_order(id))
            .await
    }

    async fn process_order(&self, order: &Order) -> Result<(), OrderError> {
        let op = operation!(Orders for S::NAME, process_order(&Order));
        self.interceptor
            .invoke_async(&op, self.inner.process_order(order))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures_util::future::join_all;
    use interpose_core::{
        templates, DirectiveRegistry, DirectiveSet, LogLevel, MemorySink, RegistryBuilder, Timing,
    };

    use super::*;
    use crate::service::calculator::{self, CalculatorService};
    use crate::service::orders::{self, OrderService};

    fn declared() -> RegistryBuilder {
        let mut builder = DirectiveRegistry::builder();
        calculator::declare_directives(&mut builder);
        orders::declare_directives(&mut builder);
        builder
    }

    fn decorate<S>(service: S, mut builder: RegistryBuilder) -> (Intercepted<S>, MemorySink) {
        let sink = MemorySink::new();
        let interceptor = Interceptor::new(Arc::new(builder.build()), Arc::new(sink.clone()));
        (Intercepted::new(service, interceptor), sink)
    }

    fn elapsed_of(sink: &MemorySink, template: &str) -> u64 {
        sink.entries()
            .into_iter()
            .find(|e| e.template == template)
            .and_then(|e| e.elapsed_ms)
            .unwrap()
    }

    #[test]
    fn add_is_timed_and_bracketed_by_entry_exit() {
        let (calc, sink) = decorate(CalculatorService, declared());

        assert_eq!(calc.add(10, 5), 15);

        let messages = sink.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], "[ENTRY] Entering CalculatorService.add");
        assert_eq!(messages[1], "[TIME] Starting Adding two numbers");
        assert!(messages[2].starts_with("[TIME] Completed Adding two numbers in "));
        assert_eq!(messages[3], "[EXIT] Exiting CalculatorService.add");
        assert!(elapsed_of(&sink, templates::TIMING_COMPLETE) >= 100);
    }

    #[test]
    fn divide_by_zero_logs_declared_error_message() {
        let (calc, sink) = decorate(CalculatorService, declared());

        assert_eq!(calc.divide(10, 0), Err(CalcError::DivideByZero));

        let errors: Vec<_> = sink
            .entries()
            .into_iter()
            .filter(|e| e.level == LogLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .message
            .starts_with("[ERROR] Division failed in CalculatorService.divide after "));
        assert_eq!(errors[0].error.as_deref(), Some("attempted to divide by zero"));
        assert!(errors[0].elapsed_ms.unwrap() >= 50);
        assert_eq!(sink.count(|e| e.template == templates::EXIT), 0);
        assert_eq!(sink.count(|e| e.template == templates::TIMING_COMPLETE), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn process_data_failure_falls_back_to_unhandled_error() {
        let (calc, sink) = decorate(CalculatorService, declared());

        let err = calc.process_data("").await.unwrap_err();

        assert_eq!(err, CalcError::InvalidArgument("Data cannot be empty".to_string()));
        let error = sink
            .entries()
            .into_iter()
            .find(|e| e.level == LogLevel::Error)
            .unwrap();
        assert!(error
            .message
            .starts_with("[ERROR] Unhandled error in CalculatorService.process_data after "));
        assert!(error.elapsed_ms.unwrap() >= 200);
    }

    #[tokio::test(start_paused = true)]
    async fn process_data_success_returns_inner_value() {
        let (calc, sink) = decorate(CalculatorService, declared());

        assert_eq!(
            calc.process_data("test data").await.unwrap(),
            "Processed: TEST DATA"
        );
        assert!(elapsed_of(&sink, templates::TIMING_COMPLETE) >= 200);
        assert_eq!(sink.count(|e| e.template == templates::EXIT), 1);
    }

    #[test]
    fn contract_declaration_outranks_implementation() {
        let mut builder = declared();
        builder.contract_method(
            "Calculator",
            "add",
            &["i32", "i32"],
            DirectiveSet::new().with_timing(Timing::new("Contract addition")),
        );
        let (calc, sink) = decorate(CalculatorService, builder);

        calc.add(1, 2);

        assert_eq!(sink.messages()[1], "[TIME] Starting Contract addition");
        // Entry/exit still comes from the implementation type.
        assert_eq!(sink.count(|e| e.template == templates::ENTRY), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn orders_are_intercepted_per_call() {
        let (orders, sink) = decorate(OrderService, declared());

        let fetched = join_all((1..=3).map(|id| orders.get_order(id))).await;
        for (id, order) in (1..=3).zip(fetched) {
            assert_eq!(order.unwrap().id, id);
        }
        assert_eq!(sink.count(|e| e.template == templates::ENTRY), 3);
        assert_eq!(sink.count(|e| e.template == templates::EXIT), 3);

        let mut order = orders.get_order(4).await.unwrap();
        order.amount_cents = 0;
        sink.clear();
        let err = orders.process_order(&order).await.unwrap_err();

        assert_eq!(err, OrderError::InvalidAmount { id: 4 });
        let messages = sink.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "[TIME] Starting Processing order");
        assert!(messages[1]
            .starts_with("[ERROR] Order processing failed in OrderService.process_order after "));
        assert!(elapsed_of(&sink, templates::ERROR) >= 300);
    }

    #[test]
    fn decorated_service_is_usable_as_trait_object() {
        let (calc, _sink) = decorate(CalculatorService, declared());
        let calc: Arc<dyn Calculator> = Arc::new(calc);
        assert_eq!(calc.divide(9, 3), Ok(3));
    }
}
