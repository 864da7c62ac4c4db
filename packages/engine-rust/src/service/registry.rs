use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

// ---------------------------------------------------------------------------
// ServiceRegistry
// ---------------------------------------------------------------------------

/// A registered service, stored as `Arc<Arc<C>>` behind `Any`.
#[derive(Clone)]
struct Registered {
    contract: TypeId,
    service: Arc<dyn Any + Send + Sync>,
}

impl Registered {
    fn downcast<C: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<C>> {
        self.service
            .clone()
            .downcast::<Arc<C>>()
            .ok()
            .map(|service| Arc::clone(&*service))
    }
}

/// Registry of contract implementations.
///
/// Provides two lookup mechanisms:
/// - **By contract** (`get::<dyn C>`): keyed by the `TypeId` of the contract
///   trait object
/// - **By name** (`get_by_name::<dyn C>`): the name given at registration
///
/// Registering the same contract twice replaces the earlier implementation.
pub struct ServiceRegistry {
    /// Name-based lookup.
    by_name: DashMap<&'static str, Registered>,
    /// Contract-based lookup.
    by_type: DashMap<TypeId, Registered>,
    /// Registration order.
    order: RwLock<Vec<&'static str>>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_name: DashMap::new(),
            by_type: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }

    /// Register `service` as the implementation of contract `C`.
    pub fn register<C>(&self, name: &'static str, service: Arc<C>)
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let registered = Registered {
            contract: TypeId::of::<C>(),
            service: Arc::new(service),
        };
        self.by_type.insert(registered.contract, registered.clone());
        if self.by_name.insert(name, registered).is_none() {
            self.order.write().push(name);
        }
        tracing::debug!(service = name, contract = type_name::<C>(), "registered service");
    }

    /// Retrieve the implementation of contract `C`.
    pub fn get<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.by_type
            .get(&TypeId::of::<C>())
            .and_then(|entry| entry.value().downcast::<C>())
    }

    /// Retrieve a service by name, provided it implements contract `C`.
    pub fn get_by_name<C>(&self, name: &str) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.by_name
            .get(name)
            .filter(|entry| entry.contract == TypeId::of::<C>())
            .and_then(|entry| entry.value().downcast::<C>())
    }

    /// Like [`ServiceRegistry::get`], but a missing contract is an error.
    ///
    /// # Errors
    ///
    /// Returns an error naming the contract when nothing is registered for it.
    pub fn require<C>(&self) -> anyhow::Result<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.get::<C>()
            .ok_or_else(|| anyhow::anyhow!("no service registered for {}", type_name::<C>()))
    }

    /// Service names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.order.read().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    trait Counter: Send + Sync {
        fn count(&self) -> u32;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    struct French;

    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".to_string()
        }
    }

    struct Fixed(u32);

    impl Counter for Fixed {
        fn count(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn register_and_get_by_contract() {
        let registry = ServiceRegistry::new();
        registry.register::<dyn Greeter>("english", Arc::new(English));

        let svc = registry.get::<dyn Greeter>();
        assert!(svc.is_some());
        assert_eq!(svc.unwrap().greet(), "hello");
    }

    #[test]
    fn get_unregistered_contract_returns_none() {
        let registry = ServiceRegistry::new();
        assert!(registry.get::<dyn Counter>().is_none());
        assert!(registry.require::<dyn Counter>().is_err());
    }

    #[test]
    fn get_by_name_checks_the_contract() {
        let registry = ServiceRegistry::new();
        registry.register::<dyn Counter>("fixed", Arc::new(Fixed(3)));

        assert_eq!(registry.get_by_name::<dyn Counter>("fixed").unwrap().count(), 3);
        assert!(registry.get_by_name::<dyn Greeter>("fixed").is_none());
        assert!(registry.get_by_name::<dyn Counter>("nonexistent").is_none());
    }

    #[test]
    fn later_registration_replaces_contract() {
        let registry = ServiceRegistry::new();
        registry.register::<dyn Greeter>("english", Arc::new(English));
        registry.register::<dyn Greeter>("french", Arc::new(French));

        assert_eq!(registry.require::<dyn Greeter>().unwrap().greet(), "bonjour");
        assert_eq!(
            registry.get_by_name::<dyn Greeter>("english").unwrap().greet(),
            "hello"
        );
    }

    #[test]
    fn names_follow_registration_order() {
        let registry = ServiceRegistry::new();
        registry.register::<dyn Counter>("svc-b", Arc::new(Fixed(1)));
        registry.register::<dyn Greeter>("svc-a", Arc::new(English));
        registry.register::<dyn Counter>("svc-b", Arc::new(Fixed(2)));

        assert_eq!(registry.names(), vec!["svc-b", "svc-a"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.require::<dyn Counter>().unwrap().count(), 2);
    }

    #[test]
    fn concrete_types_can_be_registered_too() {
        let registry = ServiceRegistry::new();
        registry.register("fixed", Arc::new(Fixed(7)));
        assert_eq!(registry.get::<Fixed>().unwrap().0, 7);
        assert!(registry.get::<dyn Counter>().is_none());
    }
}
