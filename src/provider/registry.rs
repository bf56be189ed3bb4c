//! Provider registry keyed by provider id.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::IconProvider;
use crate::error::Result;
use crate::icon::{Icon, IconVariant};

/// Provider used when a request names no provider.
pub const DEFAULT_PROVIDER_ID: &str = "3dicons";

/// Registered providers, keyed by id, in registration order.
///
/// Re-registering an id replaces the previous provider (last write wins).
/// Lookups that name no provider fall back to the default provider id;
/// lookups naming an unregistered id resolve to nothing.
pub struct ProviderRegistry {
    providers: RwLock<IndexMap<String, Arc<dyn IconProvider>>>,
    default_id: String,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PROVIDER_ID)
    }
}

impl ProviderRegistry {
    /// Creates an empty registry falling back to `default_id`.
    pub fn new(default_id: impl Into<String>) -> Self {
        Self {
            providers: RwLock::new(IndexMap::new()),
            default_id: default_id.into(),
        }
    }

    /// The id [`resolve`](Self::resolve) falls back to.
    pub fn default_provider_id(&self) -> &str {
        &self.default_id
    }

    /// Adds a provider, replacing any provider registered under the same id.
    pub fn register(&self, provider: Arc<dyn IconProvider>) {
        let id = provider.id().to_string();
        if self.providers.write().insert(id.clone(), provider).is_some() {
            log::debug!("Replaced icon provider '{id}'");
        } else {
            log::debug!("Registered icon provider '{id}'");
        }
    }

    /// Removes a provider. Returns it if it was registered.
    pub fn unregister(&self, id: &str) -> Option<Arc<dyn IconProvider>> {
        self.providers.write().shift_remove(id)
    }

    /// Returns true if a provider is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.providers.read().contains_key(id)
    }

    /// Snapshot of all registered providers in registration order.
    pub fn list(&self) -> Vec<Arc<dyn IconProvider>> {
        self.providers.read().values().cloned().collect()
    }

    /// Returns the provider registered under exactly `id`.
    pub fn get(&self, id: &str) -> Option<Arc<dyn IconProvider>> {
        self.providers.read().get(id).cloned()
    }

    /// Returns the provider for `id`, or the default provider when no id
    /// is given. An empty id counts as not given.
    pub fn resolve(&self, id: Option<&str>) -> Option<Arc<dyn IconProvider>> {
        let id = id
            .filter(|id| !id.is_empty())
            .unwrap_or(self.default_id.as_str());
        self.providers.read().get(id).cloned()
    }

    /// Searches the resolved provider.
    ///
    /// Returns an empty list, not an error, when no provider resolves.
    /// Surrounding whitespace is trimmed and a blank query lists everything.
    pub async fn search(&self, query: Option<&str>, provider_id: Option<&str>) -> Result<Vec<Icon>> {
        let Some(provider) = self.resolve(provider_id) else {
            log::warn!("No icon provider for search (requested {provider_id:?})");
            return Ok(Vec::new());
        };

        let query = query.map(str::trim).filter(|q| !q.is_empty());
        provider.search(query).await
    }

    /// Lists variants from the resolved provider.
    ///
    /// Returns an empty list, not an error, when no provider resolves.
    pub async fn get_variants(
        &self,
        icon_id: &str,
        provider_id: Option<&str>,
    ) -> Result<Vec<IconVariant>> {
        let Some(provider) = self.resolve(provider_id) else {
            log::warn!("No icon provider for variants of '{icon_id}' (requested {provider_id:?})");
            return Ok(Vec::new());
        };

        provider.get_variants(icon_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::StubProvider;

    fn ids(registry: &ProviderRegistry) -> Vec<String> {
        registry.list().iter().map(|p| p.id().to_string()).collect()
    }

    #[test]
    fn resolve_falls_back_to_default_only_without_id() {
        let registry = ProviderRegistry::default();
        registry.register(Arc::new(StubProvider::new(DEFAULT_PROVIDER_ID)));
        registry.register(Arc::new(StubProvider::new("alpha")));

        assert_eq!(registry.resolve(Some("alpha")).unwrap().id(), "alpha");
        assert_eq!(registry.resolve(None).unwrap().id(), DEFAULT_PROVIDER_ID);
        assert_eq!(registry.resolve(Some("")).unwrap().id(), DEFAULT_PROVIDER_ID);
        assert!(registry.resolve(Some("nonexistent")).is_none());
    }

    #[test]
    fn get_does_not_fall_back() {
        let registry = ProviderRegistry::default();
        registry.register(Arc::new(StubProvider::new(DEFAULT_PROVIDER_ID)));

        assert!(registry.get("ghost").is_none());
        assert_eq!(registry.get(DEFAULT_PROVIDER_ID).unwrap().id(), DEFAULT_PROVIDER_ID);
    }

    #[test]
    fn resolve_without_default_returns_none() {
        let registry = ProviderRegistry::default();
        registry.register(Arc::new(StubProvider::new("alpha")));

        assert!(registry.resolve(Some("nonexistent")).is_none());
        assert!(registry.resolve(None).is_none());
    }

    #[test]
    fn register_replaces_same_id() {
        let registry = ProviderRegistry::default();
        registry.register(Arc::new(StubProvider::new("alpha")));
        registry.register(Arc::new(StubProvider::new("beta")));
        registry.register(Arc::new(StubProvider::new("alpha").with_label("Alpha v2")));

        assert_eq!(ids(&registry), vec!["alpha", "beta"]);
        assert_eq!(registry.resolve(Some("alpha")).unwrap().label(), "Alpha v2");
    }

    #[test]
    fn unregister_removes_provider() {
        let registry = ProviderRegistry::default();
        registry.register(Arc::new(StubProvider::new("alpha")));
        registry.register(Arc::new(StubProvider::new("beta")));

        assert!(registry.unregister("alpha").is_some());
        assert!(!registry.contains("alpha"));
        assert_eq!(ids(&registry), vec!["beta"]);
        assert!(registry.unregister("alpha").is_none());
    }

    #[tokio::test]
    async fn search_with_unknown_provider_is_empty() {
        let registry = ProviderRegistry::default();
        registry.register(Arc::new(StubProvider::new("alpha")));

        let icons = registry.search(Some("box"), Some("ghost")).await.unwrap();
        assert!(icons.is_empty());

        let variants = registry.get_variants("box", Some("ghost")).await.unwrap();
        assert!(variants.is_empty());
    }

    #[tokio::test]
    async fn unknown_provider_does_not_search_default() {
        let registry = ProviderRegistry::default();
        let default = Arc::new(StubProvider::new(DEFAULT_PROVIDER_ID));
        registry.register(default.clone());

        let icons = registry.search(Some("rocket"), Some("ghost")).await.unwrap();
        assert!(icons.is_empty());
        assert!(default.queries().is_empty());

        let variants = registry.get_variants("rocket", Some("ghost")).await.unwrap();
        assert!(variants.is_empty());
    }

    #[tokio::test]
    async fn search_trims_query() {
        let registry = ProviderRegistry::default();
        let stub = Arc::new(StubProvider::new("alpha"));
        registry.register(stub.clone());

        registry.search(Some("  box "), Some("alpha")).await.unwrap();
        registry.search(Some("   "), Some("alpha")).await.unwrap();

        assert_eq!(stub.queries(), vec![Some("box".to_string()), None]);
    }

    #[tokio::test]
    async fn get_variants_delegates() {
        let registry = ProviderRegistry::default();
        registry.register(Arc::new(StubProvider::new("alpha")));

        let variants = registry.get_variants("x1", Some("alpha")).await.unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].style, "flat");
    }
}
