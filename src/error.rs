//! Error types for icon lookup and rendering.

use std::fmt::Display;

use thiserror::Error;

/// Errors that can occur while resolving providers or rendering icons.
///
/// The type is `Clone` because one render failure is delivered to every
/// caller waiting on the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IconError {
    /// Neither the requested provider nor the default provider is registered.
    #[error("unknown icon provider: {0}")]
    UnknownProvider(String),

    /// The provider has no icon with this id.
    #[error("icon '{icon_id}' not found in provider '{provider}'")]
    IconNotFound { provider: String, icon_id: String },

    /// The request does not fit what the provider can render.
    #[error("invalid render parameters: {0}")]
    InvalidParams(String),

    /// The provider failed for any other reason (network, rate limit, ...).
    #[error("provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    /// An icon catalog manifest could not be parsed.
    #[error("invalid icon catalog: {0}")]
    Catalog(String),

    /// Service configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl IconError {
    /// Wraps an arbitrary provider-side error.
    pub fn provider(provider: impl Into<String>, err: impl Display) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T, E = IconError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_message() {
        let err = IconError::provider("alpha", "rate limited");
        assert_eq!(err.to_string(), "provider 'alpha' failed: rate limited");
    }

    #[test]
    fn unknown_provider_message() {
        let err = IconError::UnknownProvider("ghost".into());
        assert!(err.to_string().contains("ghost"));
    }
}
