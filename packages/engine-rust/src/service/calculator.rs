//! Calculator contract and its plain implementation.

use std::time::Duration;

use async_trait::async_trait;
use interpose_core::{DirectiveSet, ErrorDirective, Implementation, RegistryBuilder, Timing};

/// Failures raised by [`Calculator`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    #[error("attempted to divide by zero")]
    DivideByZero,
    #[error("arithmetic overflow")]
    Overflow,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[async_trait]
pub trait Calculator: Send + Sync {
    /// Blocks the calling thread for ~100ms.
    fn add(&self, a: i32, b: i32) -> i32;

    /// Blocks the calling thread for ~50ms.
    ///
    /// # Errors
    ///
    /// [`CalcError::DivideByZero`] when `b` is zero, [`CalcError::Overflow`]
    /// for `i32::MIN / -1`.
    fn divide(&self, a: i32, b: i32) -> Result<i32, CalcError>;

    /// Suspends for ~200ms, then upper-cases `data`.
    ///
    /// # Errors
    ///
    /// [`CalcError::InvalidArgument`] when `data` is empty.
    async fn process_data(&self, data: &str) -> Result<String, CalcError>;
}

pub(crate) const ADD_DELAY: Duration = Duration::from_millis(100);
pub(crate) const DIVIDE_DELAY: Duration = Duration::from_millis(50);
pub(crate) const PROCESS_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, Default)]
pub struct CalculatorService;

impl Implementation for CalculatorService {
    const NAME: &'static str = "CalculatorService";
}

#[async_trait]
impl Calculator for CalculatorService {
    fn add(&self, a: i32, b: i32) -> i32 {
        std::thread::sleep(ADD_DELAY);
        a.wrapping_add(b)
    }

    fn divide(&self, a: i32, b: i32) -> Result<i32, CalcError> {
        std::thread::sleep(DIVIDE_DELAY);
        if b == 0 {
            return Err(CalcError::DivideByZero);
        }
        a.checked_div(b).ok_or(CalcError::Overflow)
    }

    async fn process_data(&self, data: &str) -> Result<String, CalcError> {
        tokio::time::sleep(PROCESS_DELAY).await;
        if data.is_empty() {
            return Err(CalcError::InvalidArgument("Data cannot be empty".to_string()));
        }
        Ok(format!("Processed: {}", data.to_uppercase()))
    }
}

/// Instrumentation declared for [`CalculatorService`].
pub fn declare_directives(builder: &mut RegistryBuilder) {
    let name = CalculatorService::NAME;
    builder
        .implementation_type(name, DirectiveSet::new().with_entry_exit())
        .implementation_method(
            name,
            "add",
            &["i32", "i32"],
            DirectiveSet::new().with_timing(Timing::new("Adding two numbers")),
        )
        .implementation_method(
            name,
            "divide",
            &["i32", "i32"],
            DirectiveSet::new()
                .with_timing(Timing::new("Division operation"))
                .with_error(ErrorDirective::new("Division failed")),
        )
        .implementation_method(
            name,
            "process_data",
            &["&str"],
            DirectiveSet::new().with_timing(Timing::new("Processing async data")),
        );
}

#[cfg(test)]
mod tests {
    use interpose_core::{operation, DirectiveRegistry, MetadataProvider};

    use super::*;

    #[test]
    fn add_sums_and_wraps() {
        assert_eq!(CalculatorService.add(10, 5), 15);
        assert_eq!(CalculatorService.add(i32::MAX, 1), i32::MIN);
    }

    #[test]
    fn divide_rejects_zero_and_overflow() {
        assert_eq!(CalculatorService.divide(10, 2), Ok(5));
        assert_eq!(CalculatorService.divide(10, 0), Err(CalcError::DivideByZero));
        assert_eq!(CalculatorService.divide(i32::MIN, -1), Err(CalcError::Overflow));
    }

    #[tokio::test(start_paused = true)]
    async fn process_data_upper_cases_input() {
        assert_eq!(
            CalculatorService.process_data("test data").await.unwrap(),
            "Processed: TEST DATA"
        );
        assert_eq!(
            CalculatorService.process_data("").await,
            Err(CalcError::InvalidArgument("Data cannot be empty".to_string()))
        );
    }

    #[test]
    fn declarations_resolve_per_method() {
        let mut builder = DirectiveRegistry::builder();
        declare_directives(&mut builder);
        let registry = builder.build();

        let divide = registry
            .resolve(&operation!(Calculator for "CalculatorService", divide(i32, i32)))
            .unwrap();
        assert!(divide.entry_exit);
        assert_eq!(
            divide.timing.unwrap().description.as_deref(),
            Some("Division operation")
        );
        assert_eq!(divide.error.unwrap().message.as_deref(), Some("Division failed"));

        let process = registry
            .resolve(&operation!(Calculator for "CalculatorService", process_data(&str)))
            .unwrap();
        assert!(process.error.is_none());
    }
}
