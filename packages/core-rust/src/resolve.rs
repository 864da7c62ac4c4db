//! Directive resolution policy.
//!
//! For each directive kind independently, the first declaration found in
//! this order wins:
//!
//! 1. the contract method,
//! 2. the implementation method with the same name and parameter types,
//! 3. the implementation type.
//!
//! Directives are static configuration, so [`CachingProvider`] can memoise
//! the resolved set per descriptor.

use dashmap::DashMap;

use crate::descriptor::OperationDescriptor;
use crate::directive::{DeclarationSite, DirectiveSet};
use crate::error::MetadataError;
use crate::traits::MetadataProvider;

/// Resolve the effective directives for `op` against `provider`.
///
/// # Errors
///
/// Returns the provider's error if a site lookup fails.
pub fn resolve_directives<P>(
    provider: &P,
    op: &OperationDescriptor,
) -> Result<DirectiveSet, MetadataError>
where
    P: MetadataProvider + ?Sized,
{
    let mut resolved = DirectiveSet::default();

    for site in DeclarationSite::priority_order(op) {
        let Some(declared) = provider.declared(&site)? else {
            continue;
        };
        resolved.entry_exit |= declared.entry_exit;
        if resolved.timing.is_none() {
            resolved.timing.clone_from(&declared.timing);
        }
        if resolved.error.is_none() {
            resolved.error.clone_from(&declared.error);
        }
        if resolved.entry_exit && resolved.timing.is_some() && resolved.error.is_some() {
            break;
        }
    }

    Ok(resolved)
}

// ---------------------------------------------------------------------------
// CachingProvider
// ---------------------------------------------------------------------------

/// Memoises resolved directive sets per operation descriptor.
///
/// Failed resolutions are not cached, so a transient provider error is
/// retried on the next call.
pub struct CachingProvider<P> {
    inner: P,
    cache: DashMap<OperationDescriptor, DirectiveSet>,
}

impl<P: MetadataProvider> CachingProvider<P> {
    #[must_use]
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    /// Number of descriptors resolved so far.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: MetadataProvider> MetadataProvider for CachingProvider<P> {
    fn declared(
        &self,
        site: &DeclarationSite<&str>,
    ) -> Result<Option<&DirectiveSet>, MetadataError> {
        self.inner.declared(site)
    }

    fn resolve(&self, op: &OperationDescriptor) -> Result<DirectiveSet, MetadataError> {
        if let Some(hit) = self.cache.get(op) {
            return Ok(hit.value().clone());
        }
        let resolved = self.inner.resolve(op)?;
        self.cache.insert(*op, resolved.clone());
        Ok(resolved)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
