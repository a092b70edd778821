//! Error types for the DDNS updater
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// A required setting is absent or blank
    #[error("Missing configuration: {key} is not set")]
    MissingConfig {
        /// Environment key that was expected
        key: &'static str,
    },

    /// A setting is present but invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network unreachable, timeout, DNS failure reaching an upstream service
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx HTTP status from an upstream service
    #[error("Provider error ({provider}): HTTP {status}: {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Response body or description
        message: String,
    },

    /// Authentication errors (401/403)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors (429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// A filter query returned zero results
    #[error("{0}")]
    NotFound(String),

    /// Response body did not parse or lacked expected fields
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// Create a missing configuration error
    pub fn missing_config(key: &'static str) -> Self {
        Self::MissingConfig { key }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a provider-specific HTTP status error
    pub fn provider(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Map a non-success HTTP status to the matching error kind.
    ///
    /// `context` names the operation and ends up in the message.
    pub fn from_status(provider: &str, status: u16, context: &str, body: &str) -> Self {
        match status {
            401 | 403 => Self::auth(format!(
                "{}: invalid API token or insufficient permissions (HTTP {})",
                context, status
            )),
            404 => Self::not_found(format!("{}: not found (HTTP 404)", context)),
            429 => Self::rate_limited(format!("{}: rate limit exceeded (HTTP 429)", context)),
            _ => Self::provider(provider, status, format!("{} - {}", context, body)),
        }
    }

    /// True for the "missing/invalid setting" family
    pub fn is_config(&self) -> bool {
        matches!(self, Self::MissingConfig { .. } | Self::Config(_))
    }

    /// True when a filter query matched nothing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
