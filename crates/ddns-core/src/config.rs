//! Configuration types for the DDNS updater
//!
//! Configuration is read once at startup, from the process environment,
//! into an [`UpdaterConfig`] that is handed to every component explicitly.
//!
//! ## Environment
//!
//! Required:
//! - `TOKEN`: provider API bearer token
//! - `DOMAIN`: domain name as registered with the provider (e.g. "example.com")
//! - `HOST`: record name inside that domain (e.g. "home"); may be empty for
//!   the record at the root of the domain
//!
//! Optional:
//! - `DDNS_API_URL`: provider API base URL
//! - `DDNS_IP_URL`: IP echo service URL
//! - `DDNS_API_TIMEOUT_SECS`: timeout for provider calls (1..=300, default 30)
//! - `DDNS_MODE`: `live` (default) or `dry-run`
//! - `DDNS_STRICT`: `true` to exit non-zero when the final update fails
//! - `DDNS_LOG_LEVEL`: trace, debug, info (default), warn, error

use crate::error::{Error, Result};
use std::time::Duration;

/// Environment key for the API token
pub const ENV_TOKEN: &str = "TOKEN";
/// Environment key for the domain name
pub const ENV_DOMAIN: &str = "DOMAIN";
/// Environment key for the host/record name
pub const ENV_HOST: &str = "HOST";

const ENV_API_URL: &str = "DDNS_API_URL";
const ENV_IP_URL: &str = "DDNS_IP_URL";
const ENV_API_TIMEOUT_SECS: &str = "DDNS_API_TIMEOUT_SECS";
const ENV_MODE: &str = "DDNS_MODE";
const ENV_STRICT: &str = "DDNS_STRICT";
const ENV_LOG_LEVEL: &str = "DDNS_LOG_LEVEL";

/// Default timeout for provider API calls (seconds)
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Whether the final write is performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Perform the update
    #[default]
    Live,
    /// Do all lookups, log the intended update, skip the write
    DryRun,
}

impl RunMode {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "live" => Ok(Self::Live),
            "dry-run" | "dryrun" | "dry_run" => Ok(Self::DryRun),
            other => Err(Error::config(format!(
                "{} '{}' is not valid. Valid modes: live, dry-run",
                ENV_MODE, other
            ))),
        }
    }
}

/// Which record to keep in sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTarget {
    /// Domain name (exact-match filter for the domain lookup)
    pub domain: String,
    /// Host/record name (exact-match filter for the record lookup)
    pub host: String,
}

/// Updater configuration, immutable for the run
#[derive(Clone)]
pub struct UpdaterConfig {
    /// Provider API token
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// Record to keep in sync
    pub target: RecordTarget,

    /// Override for the provider API base URL
    pub api_base_url: Option<String>,

    /// Override for the IP echo service URL
    pub ip_echo_url: Option<String>,

    /// Timeout applied to provider API calls
    pub api_timeout: Duration,

    /// Live or dry-run
    pub mode: RunMode,

    /// Exit non-zero when the final update fails
    pub strict_update: bool,

    /// Log level name
    pub log_level: String,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for UpdaterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdaterConfig")
            .field("api_token", &"<REDACTED>")
            .field("target", &self.target)
            .field("api_base_url", &self.api_base_url)
            .field("ip_echo_url", &self.ip_echo_url)
            .field("api_timeout", &self.api_timeout)
            .field("mode", &self.mode)
            .field("strict_update", &self.strict_update)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl UpdaterConfig {
    /// Create a live configuration with defaults for every optional setting
    pub fn new(
        api_token: impl Into<String>,
        domain: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            target: RecordTarget {
                domain: domain.into(),
                host: host.into(),
            },
            api_base_url: None,
            ip_echo_url: None,
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            mode: RunMode::Live,
            strict_update: false,
            log_level: "info".to_string(),
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a key lookup function
    ///
    /// An absent or blank `TOKEN` or `DOMAIN` yields [`Error::MissingConfig`].
    /// `HOST` only has to be present: an empty value selects the record at
    /// the root of the domain. The result is validated before it is returned.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| optional(key).ok_or(Error::missing_config(key));

        let api_token = required(ENV_TOKEN)?;
        let domain = required(ENV_DOMAIN)?;
        let host = lookup(ENV_HOST)
            .map(|v| v.trim().to_string())
            .ok_or(Error::missing_config(ENV_HOST))?;

        let mut config = Self::new(api_token, domain, host);

        config.api_base_url = optional(ENV_API_URL);
        config.ip_echo_url = optional(ENV_IP_URL);

        if let Some(secs) = optional(ENV_API_TIMEOUT_SECS) {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::config(format!(
                    "{} must be a whole number of seconds. Got: {}",
                    ENV_API_TIMEOUT_SECS, secs
                ))
            })?;
            config.api_timeout = Duration::from_secs(secs);
        }

        if let Some(mode) = optional(ENV_MODE) {
            config.mode = RunMode::parse(&mode)?;
        }

        if let Some(strict) = optional(ENV_STRICT) {
            config.strict_update = parse_bool(ENV_STRICT, &strict)?;
        }

        if let Some(level) = optional(ENV_LOG_LEVEL) {
            config.log_level = level.to_lowercase();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::missing_config(ENV_TOKEN));
        }
        if self.target.domain.trim().is_empty() {
            return Err(Error::missing_config(ENV_DOMAIN));
        }

        for (key, url) in [
            (ENV_API_URL, &self.api_base_url),
            (ENV_IP_URL, &self.ip_echo_url),
        ] {
            if let Some(url) = url
                && !url.starts_with("https://")
                && !url.starts_with("http://")
            {
                return Err(Error::config(format!(
                    "{} must use HTTP or HTTPS scheme. Got: {}",
                    key, url
                )));
            }
        }

        let secs = self.api_timeout.as_secs();
        if !(1..=300).contains(&secs) {
            return Err(Error::config(format!(
                "{} must be between 1 and 300 seconds. Got: {}",
                ENV_API_TIMEOUT_SECS, secs
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config(format!(
                    "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                    ENV_LOG_LEVEL, self.log_level
                )));
            }
        }

        Ok(())
    }

    /// Whether the final write is skipped
    pub fn is_dry_run(&self) -> bool {
        self.mode == RunMode::DryRun
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::config(format!(
            "{} must be true or false. Got: {}",
            key, other
        ))),
    }
}
