//! galileo-icons: icon search and render pipeline for the canvas editor
//!
//! This crate routes icon requests to pluggable providers and puts a render
//! cache in front of them. Identical concurrent render requests share one
//! provider call, and completed renders are memoized until the cache is
//! cleared.
//!
//! # Example
//!
//! ```
//! use galileo_icons::{IconRenderParams, IconService};
//!
//! # futures::executor::block_on(async {
//! let service = IconService::new();
//!
//! // The built-in 3dicons provider is registered up front
//! let icons = service.search_icons(Some("trophy"), None).await.unwrap();
//! let variants = service.get_icon_variants(&icons[0].id, None).await.unwrap();
//!
//! let params = IconRenderParams::new(
//!     "3dicons",
//!     icons[0].id.clone(),
//!     variants[0].style.clone(),
//!     variants[0].angle,
//!     128,
//! );
//! let rendered = service.render_icon(&params).await.unwrap();
//! assert_eq!(rendered.width, 128);
//!
//! // The same request is now answered from the cache
//! assert!(service.cache().contains(&params));
//! # });
//! ```
//!
//! # Custom Providers
//!
//! Any type implementing [`IconProvider`] can be registered:
//!
//! ```
//! use std::sync::Arc;
//! use galileo_icons::{
//!     async_trait, Icon, IconProvider, IconRenderParams, IconRenderResult, IconService,
//!     IconVariant, Result,
//! };
//!
//! struct Emoji;
//!
//! #[async_trait]
//! impl IconProvider for Emoji {
//!     fn id(&self) -> &str {
//!         "emoji"
//!     }
//!
//!     async fn search(&self, _query: Option<&str>) -> Result<Vec<Icon>> {
//!         Ok(vec![Icon::new("duck", "Duck", "emoji")])
//!     }
//!
//!     async fn get_variants(&self, _icon_id: &str) -> Result<Vec<IconVariant>> {
//!         Ok(vec![IconVariant::new("flat", 0.0)])
//!     }
//!
//!     async fn render(&self, params: &IconRenderParams) -> Result<IconRenderResult> {
//!         let url = format!("emoji://{}", params.icon_id);
//!         Ok(IconRenderResult::square(url, params.size, "image/svg+xml"))
//!     }
//! }
//!
//! let service = IconService::new();
//! service.register_provider(Arc::new(Emoji));
//! assert_eq!(service.list_providers().len(), 2);
//! ```

mod cache;
mod config;
mod error;
mod icon;
mod provider;
mod service;

pub use async_trait::async_trait;

pub use cache::{CacheKey, PendingRender, RenderCache, RenderFuture, build_key};
pub use config::IconServiceConfig;
pub use error::{IconError, Result};
pub use icon::{Icon, IconRenderParams, IconRenderResult, IconVariant, ProviderId};
pub use provider::{
    CatalogIcon, CatalogProvider, DEFAULT_PROVIDER_ID, IconCatalog, IconProvider,
    ProviderRegistry,
};
pub use service::IconService;
