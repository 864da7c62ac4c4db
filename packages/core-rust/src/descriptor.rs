//! Operation descriptors: the identity of an intercepted method call.
//!
//! A descriptor names the declaring contract, the concrete implementation,
//! the method and its parameter types. It is the lookup key for directive
//! resolution and the source of the canonical `Type.method` name used in
//! every log line.

use std::fmt;

/// Identity of an operation being invoked through the interception engine.
///
/// All fields are `&'static str` so descriptors can be declared as `const`
/// items next to the decorator that routes the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    /// Name of the contract (trait) that declares the operation.
    pub contract: &'static str,
    /// Name of the concrete type implementing the contract.
    pub implementation: &'static str,
    /// Method name.
    pub method: &'static str,
    /// Parameter type names, in declaration order. Distinguishes overloads.
    pub params: &'static [&'static str],
}

impl OperationDescriptor {
    #[must_use]
    pub const fn new(
        contract: &'static str,
        implementation: &'static str,
        method: &'static str,
        params: &'static [&'static str],
    ) -> Self {
        Self {
            contract,
            implementation,
            method,
            params,
        }
    }

    /// Canonical `Type.method` name used to tag log lines.
    #[must_use]
    pub fn canonical_name(&self) -> String {
        format!("{}.{}", self.implementation, self.method)
    }
}

/// Names a concrete implementation type for descriptors and declarations.
pub trait Implementation {
    /// Short type name, e.g. `"CalculatorService"`.
    const NAME: &'static str;
}

/// Build an [`OperationDescriptor`] from a method signature.
///
/// ```
/// use interpose_core::{operation, OperationDescriptor};
///
/// const GET: OperationDescriptor = operation!(Orders for "OrderService", get_order(u32));
/// assert_eq!(GET.params, &["u32"]);
/// ```
#[macro_export]
macro_rules! operation {
    ($contract:ident for $implementation:expr, $method:ident($($param:ty),* $(,)?)) => {
        $crate::OperationDescriptor::new(
            stringify!($contract),
            $implementation,
            stringify!($method),
            &[$(stringify!($param)),*],
        )
    };
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}({}) on {}",
            self.contract,
            self.method,
            self.params.join(", "),
            self.implementation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADD: OperationDescriptor =
        OperationDescriptor::new("Calculator", "CalculatorService", "add", &["i32", "i32"]);

    #[test]
    fn canonical_name_uses_implementation_type() {
        assert_eq!(ADD.canonical_name(), "CalculatorService.add");
    }

    #[test]
    fn display_includes_signature() {
        assert_eq!(
            ADD.to_string(),
            "Calculator::add(i32, i32) on CalculatorService"
        );
    }

    #[test]
    fn operation_macro_stringifies_signature() {
        const PROCESS: OperationDescriptor =
            crate::operation!(Calculator for "CalculatorService", process_data(&str));
        assert_eq!(PROCESS.contract, "Calculator");
        assert_eq!(PROCESS.method, "process_data");
        assert_eq!(PROCESS.params, &["&str"]);
        assert_eq!(
            crate::operation!(Calculator for "CalculatorService", add(i32, i32)),
            ADD
        );
    }

    #[test]
    fn overloads_are_distinct() {
        let other = OperationDescriptor::new("Calculator", "CalculatorService", "add", &["i64"]);
        assert_ne!(ADD, other);
    }
}
