//! Configuration types for the DDNS updater
//!
//! This module defines all configuration structures used throughout the workspace.
//! Loading (environment, `.env` files) belongs to the binary; everything here is
//! typed and read-only once a run starts.

use crate::error::Error;
use crate::filter::SelectionPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default "what is my IP" endpoint (plain-text body)
pub const DEFAULT_IP_SOURCE_URL: &str = "https://api.ipify.org";

/// Default GoDaddy API base URL
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.godaddy.com/v1";

/// TTL written with every record update (seconds)
pub const DEFAULT_RECORD_TTL: u32 = 3600;

/// Main DDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// Domain whose A-records are managed (e.g. "example.com")
    pub domain: String,

    /// Provider credentials
    pub credentials: Credentials,

    /// Which records are candidates for update
    #[serde(default)]
    pub selection: SelectionPolicy,

    /// Public address lookup settings
    #[serde(default)]
    pub ip_source: IpSourceConfig,

    /// Provider API settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl DdnsConfig {
    /// Create a configuration with default endpoints and settings
    pub fn new(domain: impl Into<String>, credentials: Credentials, selection: SelectionPolicy) -> Self {
        Self {
            domain: domain.into(),
            credentials,
            selection,
            ip_source: IpSourceConfig::default(),
            provider: ProviderConfig::default(),
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    ///
    /// Shape checks only: required values present, URLs carry an HTTP scheme.
    pub fn validate(&self) -> Result<(), Error> {
        if self.domain.trim().is_empty() {
            return Err(Error::config("Domain cannot be empty"));
        }

        self.credentials.validate()?;
        self.ip_source.validate()?;
        self.provider.validate()?;

        Ok(())
    }
}

/// Provider credentials
///
/// The Debug implementation intentionally does NOT expose the key or secret.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// API key
    pub api_key: String,
    /// API secret
    pub api_secret: String,
    /// Shopper (account) id sent as `X-Shopper-Id`
    pub shopper_id: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        shopper_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            shopper_id: shopper_id.into(),
        }
    }

    /// Value of the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("sso-key {}:{}", self.api_key, self.api_secret)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.api_key.is_empty() {
            return Err(Error::config("API key cannot be empty"));
        }
        if self.api_secret.is_empty() {
            return Err(Error::config("API secret cannot be empty"));
        }
        if self.shopper_id.is_empty() {
            return Err(Error::config("Shopper id cannot be empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<REDACTED>")
            .field("api_secret", &"<REDACTED>")
            .field("shopper_id", &self.shopper_id)
            .finish()
    }
}

/// Public address lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpSourceConfig {
    /// URL returning the caller's IPv4 address as plain text
    pub url: String,
}

impl IpSourceConfig {
    pub fn validate(&self) -> Result<(), Error> {
        validate_http_url("IP source URL", &self.url)
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_IP_SOURCE_URL.to_string(),
        }
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API base URL, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// TTL written with every update
    #[serde(default = "default_record_ttl")]
    pub ttl: u32,

    /// Log updates instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), Error> {
        validate_http_url("Provider base URL", &self.base_url)?;
        if self.ttl == 0 {
            return Err(Error::config("Record TTL must be > 0"));
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ttl: default_record_ttl(),
            dry_run: false,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_PROVIDER_BASE_URL.to_string()
}

fn default_record_ttl() -> u32 {
    DEFAULT_RECORD_TTL
}

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Treat any failed record update as a failed run
    ///
    /// Off by default: per-record failures are reported but the run still
    /// counts as successful.
    #[serde(default)]
    pub fail_on_partial_update: bool,
}

fn validate_http_url(what: &str, url: &str) -> Result<(), Error> {
    if url.is_empty() {
        return Err(Error::config(format!("{} cannot be empty", what)));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}

/// Split a comma-separated record list
///
/// Blank entries are dropped and all whitespace inside an entry is removed,
/// so `" www , s u b ,, "` yields `["www", "sub"]`.
pub fn parse_record_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|entry| !entry.is_empty())
        .collect()
}
