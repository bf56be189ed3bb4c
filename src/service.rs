//! Caller-facing icon service.

use std::sync::Arc;

use futures::future::{self, Either};

use crate::cache::{RenderCache, RenderFuture};
use crate::config::IconServiceConfig;
use crate::error::{IconError, Result};
use crate::icon::{Icon, IconRenderParams, IconRenderResult, IconVariant};
use crate::provider::{CatalogProvider, IconProvider, ProviderRegistry};

// ============================================================================
// IconService
// ============================================================================

/// Entry point for icon search and rendering.
///
/// `IconService` owns one [`ProviderRegistry`] and one [`RenderCache`]. Build
/// one per process and share it (it is `Send + Sync`); there is no hidden
/// global state.
///
/// # Rendering
///
/// [`render_icon`](Self::render_icon) resolves the provider named in the
/// params (an empty name means the default provider) and routes the request
/// through the render cache, so identical concurrent requests share a single
/// provider call and completed results are memoized.
///
/// # Example
///
/// ```
/// use galileo_icons::{IconRenderParams, IconService};
///
/// # futures::executor::block_on(async {
/// let service = IconService::new();
///
/// let icons = service.search_icons(Some("rocket"), None).await.unwrap();
/// assert_eq!(icons[0].id, "rocket");
///
/// let params = IconRenderParams::new("3dicons", "rocket", "clay", 0.0, 256);
/// let rendered = service.render_icon(&params).await.unwrap();
/// assert_eq!(rendered.width, 256);
/// # });
/// ```
pub struct IconService {
    registry: ProviderRegistry,
    cache: RenderCache<IconRenderResult>,
}

impl Default for IconService {
    fn default() -> Self {
        Self::new()
    }
}

impl IconService {
    /// Creates a service with the default configuration: the built-in
    /// 3dicons provider registered and an unbounded render cache.
    pub fn new() -> Self {
        Self::with_config(IconServiceConfig::default())
    }

    /// Creates a service from `config`.
    ///
    /// If the built-in catalog cannot be loaded, the error is logged and the
    /// service starts without it. Use [`try_with_config`](Self::try_with_config)
    /// to surface that failure instead.
    pub fn with_config(config: IconServiceConfig) -> Self {
        match Self::try_with_config(&config) {
            Ok(service) => service,
            Err(err) => {
                log::error!("Built-in icon catalog is unusable: {err}");
                Self::without_providers(&config)
            }
        }
    }

    /// Creates a service from `config`, failing with [`IconError::Catalog`]
    /// if the built-in catalog is requested but cannot be loaded.
    pub fn try_with_config(config: &IconServiceConfig) -> Result<Self> {
        let service = Self::without_providers(config);
        if config.register_builtin {
            service.register_provider(Arc::new(CatalogProvider::three_d_icons()?));
        }
        Ok(service)
    }

    fn without_providers(config: &IconServiceConfig) -> Self {
        let cache = match config.capacity() {
            Some(capacity) => RenderCache::with_capacity(capacity),
            None => RenderCache::new(),
        };
        Self {
            registry: ProviderRegistry::new(config.default_provider.clone()),
            cache,
        }
    }

    /// The provider registry.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The render cache.
    pub fn cache(&self) -> &RenderCache<IconRenderResult> {
        &self.cache
    }

    /// Adds or replaces a provider.
    pub fn register_provider(&self, provider: Arc<dyn IconProvider>) {
        self.registry.register(provider);
    }

    /// All registered providers in registration order.
    pub fn list_providers(&self) -> Vec<Arc<dyn IconProvider>> {
        self.registry.list()
    }

    /// Searches the given (or default) provider. Empty if none resolves.
    pub async fn search_icons(
        &self,
        query: Option<&str>,
        provider_id: Option<&str>,
    ) -> Result<Vec<Icon>> {
        self.registry.search(query, provider_id).await
    }

    /// Lists variants from the given (or default) provider. Empty if none resolves.
    pub async fn get_icon_variants(
        &self,
        icon_id: &str,
        provider_id: Option<&str>,
    ) -> Result<Vec<IconVariant>> {
        self.registry.get_variants(icon_id, provider_id).await
    }

    /// Renders an icon through the render cache.
    ///
    /// Fails with [`IconError::UnknownProvider`] when the provider named in
    /// `params` does not resolve (an empty name resolves to the default
    /// provider). Unlike search, a render is a targeted request, so an empty
    /// answer would hide a caller bug.
    ///
    /// The cache lookup and in-flight registration happen when this is
    /// called, not when the returned future is first polled.
    pub fn render_icon(&self, params: &IconRenderParams) -> RenderFuture<IconRenderResult> {
        let Some(provider) = self.registry.resolve(Some(params.provider.as_str())) else {
            log::warn!("Render requested from unknown provider '{}'", params.provider);
            return Either::Left(future::ready(Err(IconError::UnknownProvider(
                params.provider.clone(),
            ))));
        };

        let request = params.clone();
        self.cache.get_cached_render(params, move || async move {
            provider.render(&request).await
        })
    }

    /// Drops every memoized and in-flight render.
    pub fn clear_render_cache(&self) {
        self.cache.clear_all();
    }
}

// ============================================================================
// Tests
// ============================================================================
