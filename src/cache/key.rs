//! Cache keys derived from render parameters.

use std::fmt;

use crate::icon::IconRenderParams;

/// Separator between key fields. Not expected inside any field.
const SEPARATOR: char = ':';

/// Key for cached render results.
///
/// Built from exactly the five identity fields of [`IconRenderParams`], in a
/// fixed order: `provider:icon_id:style:angle:size`. Fields added to the
/// params later do not change the key unless they are added here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Creates the cache key for the given render parameters.
    pub fn from_params(params: &IconRenderParams) -> Self {
        // -0.0 and 0.0 are the same angle but display differently
        let angle = if params.angle == 0.0 { 0.0 } else { params.angle };

        Self(format!(
            "{provider}{SEPARATOR}{icon}{SEPARATOR}{style}{SEPARATOR}{angle}{SEPARATOR}{size}",
            provider = params.provider,
            icon = params.icon_id,
            style = params.style,
            size = params.size,
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

/// Builds the string cache key for `params`.
pub fn build_key(params: &IconRenderParams) -> String {
    CacheKey::from_params(params).into()
}
