//! Icon providers and the registry that routes requests to them.
//!
//! A provider is any source of icons that can search, list variants and
//! render. Providers are registered by id in a [`ProviderRegistry`]; the
//! registry dispatches by id lookup only, never by inspecting the concrete
//! provider type.

pub mod catalog;
pub mod registry;

pub use catalog::{CatalogIcon, CatalogProvider, IconCatalog};
pub use registry::{DEFAULT_PROVIDER_ID, ProviderRegistry};

use async_trait::async_trait;

use crate::error::Result;
use crate::icon::{Icon, IconRenderParams, IconRenderResult, IconVariant};

// ============================================================================
// IconProvider Trait
// ============================================================================

/// Capability interface implemented by every icon source.
///
/// Implementations do the actual work (network lookups, asset resolution,
/// rasterization). Caching and request coalescing are layered on top by
/// [`IconService`](crate::IconService); a provider's [`render`](Self::render)
/// is called at most once per concurrent identical request.
#[async_trait]
pub trait IconProvider: Send + Sync {
    /// Stable identifier used for registration and lookup.
    fn id(&self) -> &str;

    /// Display name. Defaults to the id.
    fn label(&self) -> &str {
        self.id()
    }

    /// Searches for icons. `None` lists everything the provider offers.
    async fn search(&self, query: Option<&str>) -> Result<Vec<Icon>>;

    /// Lists the style/angle variants available for one icon.
    async fn get_variants(&self, icon_id: &str) -> Result<Vec<IconVariant>>;

    /// Produces the render result for `params`.
    async fn render(&self, params: &IconRenderParams) -> Result<IconRenderResult>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::IconProvider;
    use crate::error::{IconError, Result};
    use crate::icon::{Icon, IconRenderParams, IconRenderResult, IconVariant};

    /// In-memory provider that records how it was called.
    pub struct StubProvider {
        id: String,
        label: Option<String>,
        url: Option<String>,
        delay: Option<Duration>,
        failing: AtomicBool,
        renders: AtomicUsize,
        queries: Mutex<Vec<Option<String>>>,
    }

    impl StubProvider {
        pub fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                label: None,
                url: None,
                delay: None,
                failing: AtomicBool::new(false),
                renders: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }

        pub fn with_label(mut self, label: &str) -> Self {
            self.label = Some(label.to_string());
            self
        }

        pub fn with_url(mut self, url: &str) -> Self {
            self.url = Some(url.to_string());
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn render_calls(&self) -> usize {
            self.renders.load(Ordering::SeqCst)
        }

        pub fn queries(&self) -> Vec<Option<String>> {
            self.queries.lock().clone()
        }
    }

    #[async_trait]
    impl IconProvider for StubProvider {
        fn id(&self) -> &str {
            &self.id
        }

        fn label(&self) -> &str {
            self.label.as_deref().unwrap_or(&self.id)
        }

        async fn search(&self, query: Option<&str>) -> Result<Vec<Icon>> {
            self.queries.lock().push(query.map(str::to_string));
            Ok(vec![Icon::new("box", "Box", self.id.clone())])
        }

        async fn get_variants(&self, _icon_id: &str) -> Result<Vec<IconVariant>> {
            Ok(vec![IconVariant::new("flat", 0.0)])
        }

        async fn render(&self, params: &IconRenderParams) -> Result<IconRenderResult> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(IconError::provider(&self.id, "stub failure"));
            }

            let url = self
                .url
                .clone()
                .unwrap_or_else(|| format!("stub://{}/{}", self.id, params.icon_id));
            Ok(IconRenderResult::square(url, params.size, "image/png"))
        }
    }
}
