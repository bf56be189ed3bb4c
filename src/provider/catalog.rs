//! Catalog-backed icon provider.
//!
//! An [`IconCatalog`] is a JSON manifest listing icons together with the
//! styles, angles and sizes every icon is published in. [`CatalogProvider`]
//! answers searches from the manifest and renders by computing the asset URL;
//! it never downloads or rasterizes anything itself.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "id": "3dicons",
//!   "label": "3dicons",
//!   "baseUrl": "https://cdn.3dicons.co/icons",
//!   "format": "webp",
//!   "styles": ["clay", "color"],
//!   "angles": [0, 45],
//!   "sizes": [64, 256],
//!   "icons": [{ "id": "rocket", "name": "Rocket", "tags": ["launch"] }]
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::IconProvider;
use crate::error::{IconError, Result};
use crate::icon::{Icon, IconRenderParams, IconRenderResult, IconVariant};

/// Manifest of the built-in 3dicons provider.
const THREE_D_ICONS_CATALOG: &str = include_str!("../../assets/3dicons.json");

/// Angles closer than this are considered equal.
const ANGLE_EPSILON: f32 = 1e-3;

// ============================================================================
// IconCatalog
// ============================================================================

/// One icon entry in a catalog manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CatalogIcon {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A serializable icon manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct IconCatalog {
    /// Provider id the catalog registers under.
    pub id: String,

    /// Display name.
    pub label: String,

    /// Asset root; rendered URLs are `{baseUrl}/{icon}/{style}/{angle}/{size}.{format}`.
    pub base_url: String,

    /// File extension of the published assets.
    #[serde(default = "default_format")]
    pub format: String,

    /// Styles every icon is published in.
    pub styles: Vec<String>,

    /// Angles (degrees) every style is published at.
    pub angles: Vec<f32>,

    /// Square sizes (pixels) every variant is published at.
    pub sizes: Vec<u32>,

    /// The icons, in display order.
    #[serde(default)]
    pub icons: Vec<CatalogIcon>,
}

fn default_format() -> String {
    "png".to_string()
}

impl IconCatalog {
    /// Parses a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| IconError::Catalog(e.to_string()))
    }

    /// Serializes the catalog to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Finds an icon by id.
    pub fn icon(&self, icon_id: &str) -> Option<&CatalogIcon> {
        self.icons.iter().find(|icon| icon.id == icon_id)
    }

    /// MIME type matching [`format`](Self::format).
    pub fn mime(&self) -> &'static str {
        match self.format.to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "webp" => "image/webp",
            "jpg" | "jpeg" => "image/jpeg",
            "svg" => "image/svg+xml",
            "gif" => "image/gif",
            _ => "application/octet-stream",
        }
    }

    fn asset_url(&self, icon_id: &str, style: &str, angle: f32, size: u32) -> String {
        format!(
            "{}/{}/{}/{}/{}.{}",
            self.base_url.trim_end_matches('/'),
            icon_id,
            style,
            angle,
            size,
            self.format
        )
    }

    /// The published angle within [`ANGLE_EPSILON`] of `angle`, if any.
    fn published_angle(&self, angle: f32) -> Option<f32> {
        self.angles
            .iter()
            .copied()
            .find(|a| (a - angle).abs() < ANGLE_EPSILON)
    }
}

// ============================================================================
// CatalogProvider
// ============================================================================

/// Icon provider answering from an [`IconCatalog`].
///
/// # Example
///
/// ```
/// use galileo_icons::{CatalogProvider, IconProvider, IconRenderParams};
///
/// # futures::executor::block_on(async {
/// let provider = CatalogProvider::three_d_icons().unwrap();
/// assert_eq!(provider.id(), "3dicons");
///
/// let params = IconRenderParams::new("3dicons", "rocket", "clay", 45.0, 256);
/// let result = provider.render(&params).await.unwrap();
/// assert!(result.url.ends_with("/rocket/clay/45/256.webp"));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    catalog: IconCatalog,
}

impl CatalogProvider {
    pub fn new(catalog: IconCatalog) -> Self {
        Self { catalog }
    }

    /// Parses `json` as an [`IconCatalog`] and wraps it.
    pub fn from_json(json: &str) -> Result<Self> {
        IconCatalog::from_json(json).map(Self::new)
    }

    /// The built-in 3dicons provider.
    pub fn three_d_icons() -> Result<Self> {
        Self::from_json(THREE_D_ICONS_CATALOG)
    }

    /// Replaces the asset root, e.g. to point at a mirror.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.catalog.base_url = base_url.into();
        self
    }

    pub fn catalog(&self) -> &IconCatalog {
        &self.catalog
    }

    fn to_icon(&self, entry: &CatalogIcon) -> Icon {
        let preview_url = match (
            self.catalog.styles.first(),
            self.catalog.angles.first(),
            self.catalog.sizes.first(),
        ) {
            (Some(style), Some(angle), Some(size)) => {
                Some(self.catalog.asset_url(&entry.id, style, *angle, *size))
            }
            _ => None,
        };

        Icon {
            id: entry.id.clone(),
            name: entry.name.clone(),
            provider: self.catalog.id.clone(),
            tags: entry.tags.clone(),
            preview_url,
        }
    }

    fn require_icon(&self, icon_id: &str) -> Result<&CatalogIcon> {
        self.catalog
            .icon(icon_id)
            .ok_or_else(|| IconError::IconNotFound {
                provider: self.catalog.id.clone(),
                icon_id: icon_id.to_string(),
            })
    }
}

#[async_trait]
impl IconProvider for CatalogProvider {
    fn id(&self) -> &str {
        &self.catalog.id
    }

    fn label(&self) -> &str {
        &self.catalog.label
    }

    async fn search(&self, query: Option<&str>) -> Result<Vec<Icon>> {
        let needle = query.map(str::to_lowercase);
        Ok(self
            .catalog
            .icons
            .iter()
            .map(|entry| self.to_icon(entry))
            .filter(|icon| needle.as_deref().is_none_or(|n| icon.matches(n)))
            .collect())
    }

    async fn get_variants(&self, icon_id: &str) -> Result<Vec<IconVariant>> {
        self.require_icon(icon_id)?;

        let mut variants = Vec::with_capacity(self.catalog.styles.len() * self.catalog.angles.len());
        for style in &self.catalog.styles {
            for angle in &self.catalog.angles {
                let mut variant = IconVariant::new(style.clone(), *angle);
                variant.label = Some(format!("{style} {angle}°"));
                variants.push(variant);
            }
        }
        Ok(variants)
    }

    async fn render(&self, params: &IconRenderParams) -> Result<IconRenderResult> {
        self.require_icon(&params.icon_id)?;

        if !self.catalog.styles.contains(&params.style) {
            return Err(IconError::InvalidParams(format!(
                "style '{}' is not one of {:?}",
                params.style, self.catalog.styles
            )));
        }
        let Some(angle) = self.catalog.published_angle(params.angle) else {
            return Err(IconError::InvalidParams(format!(
                "angle {} is not one of {:?}",
                params.angle, self.catalog.angles
            )));
        };
        if !self.catalog.sizes.contains(&params.size) {
            return Err(IconError::InvalidParams(format!(
                "size {} is not one of {:?}",
                params.size, self.catalog.sizes
            )));
        }

        let url = self
            .catalog
            .asset_url(&params.icon_id, &params.style, angle, params.size);
        Ok(IconRenderResult::square(url, params.size, self.catalog.mime()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> IconCatalog {
        IconCatalog::from_json(
            r#"{
                "id": "mini",
                "label": "Mini",
                "baseUrl": "https://assets.test/icons/",
                "styles": ["flat", "clay"],
                "angles": [0, 45],
                "sizes": [64],
                "icons": [
                    { "id": "box", "name": "Box", "tags": ["package", "shipping"] },
                    { "id": "rocket", "name": "Rocket" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn builtin_catalog_parses() {
        let provider = CatalogProvider::three_d_icons().unwrap();
        assert_eq!(provider.id(), "3dicons");
        assert!(!provider.catalog().icons.is_empty());
        assert_eq!(provider.catalog().mime(), "image/webp");
    }

    #[test]
    fn format_defaults_to_png() {
        let catalog = small_catalog();
        assert_eq!(catalog.format, "png");
        assert_eq!(catalog.mime(), "image/png");
    }

    #[test]
    fn malformed_catalog_is_rejected() {
        let err = IconCatalog::from_json("{\"id\": 3}").unwrap_err();
        assert!(matches!(err, IconError::Catalog(_)));
    }

    #[tokio::test]
    async fn search_matches_tags_case_insensitively() {
        let provider = CatalogProvider::new(small_catalog());

        let icons = provider.search(Some("SHIP")).await.unwrap();
        assert_eq!(icons.len(), 1);
        assert_eq!(icons[0].id, "box");
        assert_eq!(icons[0].provider, "mini");

        let all = provider.search(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(
            all[0].preview_url.as_deref(),
            Some("https://assets.test/icons/box/flat/0/64.png")
        );
    }

    #[tokio::test]
    async fn variants_cover_styles_and_angles() {
        let provider = CatalogProvider::new(small_catalog());

        let variants = provider.get_variants("rocket").await.unwrap();
        assert_eq!(variants.len(), 4);
        assert_eq!(variants[1].style, "flat");
        assert_eq!(variants[1].angle, 45.0);

        let err = provider.get_variants("ghost").await.unwrap_err();
        assert!(matches!(err, IconError::IconNotFound { .. }));
    }

    #[tokio::test]
    async fn render_builds_asset_url() {
        let provider = CatalogProvider::new(small_catalog());
        let params = IconRenderParams::new("mini", "box", "clay", 45.0, 64);

        let result = provider.render(&params).await.unwrap();
        assert_eq!(result.url, "https://assets.test/icons/box/clay/45/64.png");
        assert_eq!(result.width, 64);
        assert_eq!(result.mime, "image/png");
    }

    #[tokio::test]
    async fn near_angle_renders_published_asset() {
        let provider = CatalogProvider::new(small_catalog());
        let params = IconRenderParams::new("mini", "box", "clay", 45.0004, 64);

        let result = provider.render(&params).await.unwrap();
        assert_eq!(result.url, "https://assets.test/icons/box/clay/45/64.png");
    }

    #[tokio::test]
    async fn render_validates_params() {
        let provider = CatalogProvider::new(small_catalog());

        let bad_style = IconRenderParams::new("mini", "box", "neon", 0.0, 64);
        assert!(matches!(
            provider.render(&bad_style).await,
            Err(IconError::InvalidParams(_))
        ));

        let bad_angle = IconRenderParams::new("mini", "box", "flat", 30.0, 64);
        assert!(matches!(
            provider.render(&bad_angle).await,
            Err(IconError::InvalidParams(_))
        ));

        let bad_size = IconRenderParams::new("mini", "box", "flat", 0.0, 512);
        assert!(matches!(
            provider.render(&bad_size).await,
            Err(IconError::InvalidParams(_))
        ));

        let missing = IconRenderParams::new("mini", "ghost", "flat", 0.0, 64);
        assert!(matches!(
            provider.render(&missing).await,
            Err(IconError::IconNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn base_url_can_be_overridden() {
        let provider = CatalogProvider::new(small_catalog()).with_base_url("https://mirror.test");
        let params = IconRenderParams::new("mini", "rocket", "flat", 0.0, 64);

        let result = provider.render(&params).await.unwrap();
        assert_eq!(result.url, "https://mirror.test/rocket/flat/0/64.png");
    }
}
