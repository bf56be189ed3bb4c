//! Serializable configuration for [`IconService`](crate::IconService).
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "defaultProvider": "3dicons",
//!   "registerBuiltin": true,
//!   "cacheCapacity": 512
//! }
//! ```
//!
//! Every field is optional; `{}` yields the default configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{IconError, Result};
use crate::provider::DEFAULT_PROVIDER_ID;

/// Settings applied when an [`IconService`](crate::IconService) is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct IconServiceConfig {
    /// Provider used when a request names no provider.
    pub default_provider: String,

    /// Whether the built-in 3dicons provider is registered at construction.
    pub register_builtin: bool,

    /// Maximum number of completed renders kept in memory.
    ///
    /// `None` (or `0`) keeps every result for the lifetime of the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<usize>,
}

impl Default for IconServiceConfig {
    fn default() -> Self {
        Self {
            default_provider: DEFAULT_PROVIDER_ID.to_string(),
            register_builtin: true,
            cache_capacity: None,
        }
    }
}

impl IconServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provider used when a request names none.
    pub fn with_default_provider(mut self, id: impl Into<String>) -> Self {
        self.default_provider = id.into();
        self
    }

    /// Enables or disables registration of the built-in provider.
    pub fn with_builtin(mut self, register: bool) -> Self {
        self.register_builtin = register;
        self
    }

    /// Bounds the render cache to `capacity` completed results.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// The cache bound, if any.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.cache_capacity.and_then(NonZeroUsize::new)
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| IconError::Config(e.to_string()))
    }
}
