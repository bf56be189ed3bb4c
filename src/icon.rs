//! Icon types shared by providers, the registry and the render cache.
//!
//! These types are plain data: providers produce them, the render cache
//! keys on [`IconRenderParams`], and callers receive [`IconRenderResult`].

use serde::{Deserialize, Serialize};

/// Stable string identifier of an icon provider (e.g. `"3dicons"`).
pub type ProviderId = String;

/// A single searchable icon exposed by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    /// Provider-local identifier, passed back as [`IconRenderParams::icon_id`].
    pub id: String,

    /// Human readable name.
    pub name: String,

    /// The provider this icon came from.
    pub provider: ProviderId,

    /// Search keywords.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Optional thumbnail URL suitable for a result grid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl Icon {
    pub fn new(id: impl Into<String>, name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider: provider.into(),
            tags: Vec::new(),
            preview_url: None,
        }
    }

    /// Returns true if `needle` (already lowercased) occurs in the id, name or a tag.
    pub fn matches(&self, needle: &str) -> bool {
        self.id.to_lowercase().contains(needle)
            || self.name.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

/// A renderable variant of an icon: one style seen from one angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct IconVariant {
    pub style: String,
    pub angle: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl IconVariant {
    pub fn new(style: impl Into<String>, angle: f32) -> Self {
        Self {
            style: style.into(),
            angle,
            label: None,
        }
    }
}

/// Parameters of a single render request.
///
/// All five fields form the identity of the request: two params with equal
/// fields are the same logical request and share one cache entry.
///
/// ```json
/// { "provider": "3dicons", "iconId": "rocket", "style": "clay", "angle": 45, "size": 256 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct IconRenderParams {
    /// Provider to render with. An empty id means the default provider.
    pub provider: ProviderId,

    /// Provider-local icon identifier.
    pub icon_id: String,

    /// Visual style (e.g. `"clay"`, `"gradient"`).
    pub style: String,

    /// Viewing angle in degrees.
    pub angle: f32,

    /// Edge length of the square output in pixels.
    pub size: u32,
}

impl IconRenderParams {
    pub fn new(
        provider: impl Into<String>,
        icon_id: impl Into<String>,
        style: impl Into<String>,
        angle: f32,
        size: u32,
    ) -> Self {
        Self {
            provider: provider.into(),
            icon_id: icon_id.into(),
            style: style.into(),
            angle,
            size,
        }
    }
}

/// The payload a provider produces for one [`IconRenderParams`].
///
/// Treated as immutable once produced; the cache hands out clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct IconRenderResult {
    /// Where the rendered asset can be loaded from.
    pub url: String,

    /// Pixel width of the asset.
    pub width: u32,

    /// Pixel height of the asset.
    pub height: u32,

    /// MIME type of the asset (e.g. `image/png`).
    pub mime: String,
}

impl IconRenderResult {
    /// Creates a square result of `size` pixels.
    pub fn square(url: impl Into<String>, size: u32, mime: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: size,
            height: size,
            mime: mime.into(),
        }
    }
}
