// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS updater.
//
// ## Architecture
//
// Asks a "what is my IP" service (e.g. api.ipify.org) for the caller's
// public address. The service answers with the bare address as plain text.
//
// One GET per `current()` call. No caching, no polling, no retries: a failed
// lookup is returned to the engine, which aborts the run.

use ddns_core::config::IpSourceConfig;
use ddns_core::traits::{IpSource, IpVersion};
use ddns_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Default HTTP timeout for address lookups
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the address from
    url: String,

    /// Only accept addresses of this version (None = both)
    version: Option<IpVersion>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source accepting either address version
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the address from (e.g., "https://api.ipify.org")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_version(url, None)
    }

    /// Create an HTTP IP source that rejects anything but IPv4
    pub fn ipv4(url: impl Into<String>) -> Result<Self> {
        Self::with_version(url, Some(IpVersion::V4))
    }

    /// Create an HTTP IP source from configuration
    pub fn from_config(config: &IpSourceConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.url.clone())
    }

    fn with_version(url: impl Into<String>, version: Option<IpVersion>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            version,
            client,
        })
    }

    /// URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Parse a plain-text lookup body into an address
fn parse_ip_body(body: &str) -> Result<IpAddr> {
    let ip_text = body.trim();
    ip_text
        .parse()
        .map_err(|_| Error::network(format!("Invalid IP address: {:?}", ip_text)))
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        tracing::debug!("Looking up public IP via {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!("HTTP error: {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        let ip = parse_ip_body(&body)?;

        if let Some(version) = self.version {
            if !version.matches(&ip) {
                return Err(Error::type_mismatch(format!(
                    "Expected {:?} address, got: {}",
                    version, ip
                )));
            }
        }

        tracing::debug!("Public IP is {}", ip);
        Ok(ip)
    }

    fn version(&self) -> Option<IpVersion> {
        self.version
    }
}
