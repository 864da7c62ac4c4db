//! Static directive registry.
//!
//! Declarations are collected once at startup through [`RegistryBuilder`]
//! (from code or from a [`DirectiveManifest`]) and never change afterwards,
//! so the built registry is shared freely between concurrent invocations.

use std::collections::HashMap;

use crate::directive::{DeclarationSite, DirectiveSet};
use crate::error::MetadataError;
use crate::manifest::DirectiveManifest;
use crate::traits::MetadataProvider;

// ---------------------------------------------------------------------------
// MethodTable
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Overload {
    params: Vec<String>,
    directives: DirectiveSet,
}

/// Owner name -> method name -> overloads keyed by parameter types.
#[derive(Debug, Default)]
struct MethodTable {
    owners: HashMap<String, HashMap<String, Vec<Overload>>>,
}

impl MethodTable {
    fn get(&self, owner: &str, method: &str, params: &[&str]) -> Option<&DirectiveSet> {
        self.owners
            .get(owner)?
            .get(method)?
            .iter()
            .find(|o| o.params.iter().map(String::as_str).eq(params.iter().copied()))
            .map(|o| &o.directives)
    }

    fn declare(&mut self, owner: &str, method: &str, params: &[&str], set: DirectiveSet) {
        let overloads = self
            .owners
            .entry(owner.to_string())
            .or_default()
            .entry(method.to_string())
            .or_default();

        let existing = overloads
            .iter_mut()
            .find(|o| o.params.iter().map(String::as_str).eq(params.iter().copied()));
        match existing {
            Some(overload) => overload.directives.merge(set),
            None => overloads.push(Overload {
                params: params.iter().map(ToString::to_string).collect(),
                directives: set,
            }),
        }
    }

    fn len(&self) -> usize {
        self.owners
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }
}

// ---------------------------------------------------------------------------
// DirectiveRegistry
// ---------------------------------------------------------------------------

/// Immutable map from declaration sites to directive sets.
#[derive(Debug, Default)]
pub struct DirectiveRegistry {
    contract_methods: MethodTable,
    implementation_methods: MethodTable,
    implementation_types: HashMap<String, DirectiveSet>,
}

impl DirectiveRegistry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Total number of declaration sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contract_methods.len()
            + self.implementation_methods.len()
            + self.implementation_types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetadataProvider for DirectiveRegistry {
    fn declared(
        &self,
        site: &DeclarationSite<&str>,
    ) -> Result<Option<&DirectiveSet>, MetadataError> {
        Ok(match site {
            DeclarationSite::ContractMethod {
                contract,
                method,
                params,
            } => self.contract_methods.get(contract, method, params),
            DeclarationSite::ImplementationMethod {
                implementation,
                method,
                params,
            } => self
                .implementation_methods
                .get(implementation, method, params),
            DeclarationSite::ImplementationType { implementation } => {
                self.implementation_types.get(*implementation)
            }
        })
    }
}

// ---------------------------------------------------------------------------
// RegistryBuilder
// ---------------------------------------------------------------------------

/// Collects declarations before freezing them into a [`DirectiveRegistry`].
///
/// Declaring twice at the same site merges the sets (see [`DirectiveSet::merge`]).
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: DirectiveRegistry,
}

impl RegistryBuilder {
    /// Declare directives on a method of the abstract contract.
    pub fn contract_method(
        &mut self,
        contract: &str,
        method: &str,
        params: &[&str],
        set: DirectiveSet,
    ) -> &mut Self {
        self.registry
            .contract_methods
            .declare(contract, method, params, set);
        self
    }

    /// Declare directives on the implementing type's method.
    pub fn implementation_method(
        &mut self,
        implementation: &str,
        method: &str,
        params: &[&str],
        set: DirectiveSet,
    ) -> &mut Self {
        self.registry
            .implementation_methods
            .declare(implementation, method, params, set);
        self
    }

    /// Declare directives on the implementing type as a whole.
    pub fn implementation_type(&mut self, implementation: &str, set: DirectiveSet) -> &mut Self {
        self.registry
            .implementation_types
            .entry(implementation.to_string())
            .or_default()
            .merge(set);
        self
    }

    pub fn declare<S: AsRef<str>>(&mut self, site: &DeclarationSite<S>, set: DirectiveSet) -> &mut Self {
        match site.as_str_site() {
            DeclarationSite::ContractMethod {
                contract,
                method,
                params,
            } => self.contract_method(contract, method, &params, set),
            DeclarationSite::ImplementationMethod {
                implementation,
                method,
                params,
            } => self.implementation_method(implementation, method, &params, set),
            DeclarationSite::ImplementationType { implementation } => {
                self.implementation_type(implementation, set)
            }
        }
    }

    /// Apply every entry of `manifest`, in document order.
    pub fn extend_from_manifest(&mut self, manifest: DirectiveManifest) -> &mut Self {
        for entry in manifest.directives {
            self.declare(&entry.site, entry.directives);
        }
        self
    }

    /// Freeze the declarations collected so far, leaving the builder empty.
    pub fn build(&mut self) -> DirectiveRegistry {
        std::mem::take(&mut self.registry)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
