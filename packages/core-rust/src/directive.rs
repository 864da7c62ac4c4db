//! Instrumentation directives and the sites they are declared on.

use serde::{Deserialize, Serialize};

use crate::descriptor::OperationDescriptor;

/// Message used when an Error directive is declared without its own text.
pub const DEFAULT_ERROR_MESSAGE: &str = "Error occurred";

/// Message used when no Error directive resolves for a failing operation.
pub const UNHANDLED_ERROR_MESSAGE: &str = "Unhandled error";

/// Timing marker: log elapsed wall-clock time on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Timing {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }

    /// The declared description, or the operation's canonical name.
    #[must_use]
    pub fn describe<'a>(&'a self, canonical_name: &'a str) -> &'a str {
        self.description.as_deref().unwrap_or(canonical_name)
    }
}

/// Error marker: custom message for the error-level line on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDirective {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorDirective {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_ERROR_MESSAGE)
    }
}

/// The directives attached to one declaration site, or the resolved
/// directives for one operation.
///
/// Each kind is independent: resolution picks every kind from the
/// highest-priority site that declares it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveSet {
    /// Log an entering line before the call and an exiting line after success.
    #[serde(default)]
    pub entry_exit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDirective>,
}

impl DirectiveSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry_exit(mut self) -> Self {
        self.entry_exit = true;
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = Some(timing);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: ErrorDirective) -> Self {
        self.error = Some(error);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.entry_exit && self.timing.is_none() && self.error.is_none()
    }

    /// Overlay a later declaration made at the same site.
    ///
    /// Kinds present in `other` replace the current ones; entry/exit is
    /// never switched off by an overlay.
    pub fn merge(&mut self, other: DirectiveSet) {
        self.entry_exit |= other.entry_exit;
        if other.timing.is_some() {
            self.timing = other.timing;
        }
        if other.error.is_some() {
            self.error = other.error;
        }
    }
}

/// Where a directive set is declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "on", rename_all = "snake_case")]
pub enum DeclarationSite<S = String> {
    /// A method of the abstract contract.
    ContractMethod {
        contract: S,
        method: S,
        #[serde(default = "Vec::new")]
        params: Vec<S>,
    },
    /// The implementing type's method with the same name and signature.
    ImplementationMethod {
        implementation: S,
        method: S,
        #[serde(default = "Vec::new")]
        params: Vec<S>,
    },
    /// The implementing type itself.
    ImplementationType { implementation: S },
}

impl DeclarationSite<&'static str> {
    /// The three sites checked for `op`, highest priority first.
    #[must_use]
    pub fn priority_order(op: &OperationDescriptor) -> [Self; 3] {
        [
            Self::ContractMethod {
                contract: op.contract,
                method: op.method,
                params: op.params.to_vec(),
            },
            Self::ImplementationMethod {
                implementation: op.implementation,
                method: op.method,
                params: op.params.to_vec(),
            },
            Self::ImplementationType {
                implementation: op.implementation,
            },
        ]
    }
}

impl<S: AsRef<str>> DeclarationSite<S> {
    /// Borrow the site as string slices for lookups.
    #[must_use]
    pub fn as_str_site(&self) -> DeclarationSite<&str> {
        match self {
            Self::ContractMethod {
                contract,
                method,
                params,
            } => DeclarationSite::ContractMethod {
                contract: contract.as_ref(),
                method: method.as_ref(),
                params: params.iter().map(AsRef::as_ref).collect(),
            },
            Self::ImplementationMethod {
                implementation,
                method,
                params,
            } => DeclarationSite::ImplementationMethod {
                implementation: implementation.as_ref(),
                method: method.as_ref(),
                params: params.iter().map(AsRef::as_ref).collect(),
            },
            Self::ImplementationType { implementation } => DeclarationSite::ImplementationType {
                implementation: implementation.as_ref(),
            },
        }
    }
}

impl<S: AsRef<str>> std::fmt::Display for DeclarationSite<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |params: &[S]| {
            params
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Self::ContractMethod {
                contract,
                method,
                params,
            } => write!(f, "{}::{}({})", contract.as_ref(), method.as_ref(), join(params.as_slice())),
            Self::ImplementationMethod {
                implementation,
                method,
                params,
            } => write!(
                f,
                "{}.{}({})",
                implementation.as_ref(),
                method.as_ref(),
                join(params.as_slice())
            ),
            Self::ImplementationType { implementation } => {
                write!(f, "type {}", implementation.as_ref())
            }
        }
    }
}
