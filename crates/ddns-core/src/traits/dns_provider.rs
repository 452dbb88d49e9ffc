// # DNS Provider Trait
//
// Defines the interface for reading and updating A-records via provider APIs.
//
// ## Implementations
//
// - GoDaddy: `ddns-provider-godaddy` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let records = provider.list_records().await?;
//     provider.update_record("www", std::net::Ipv4Addr::new(192, 168, 1, 1)).await?;
//
//     Ok(())
// }
// ```

use crate::record::DnsRecord;
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for DNS provider implementations
///
/// A provider is bound to one domain and one set of credentials at
/// construction time; both are read-only for the provider's lifetime, so a
/// single instance can serve concurrent calls.
///
/// # Contract
///
/// - Exactly one API call per method invocation
/// - No retry or backoff logic
/// - No spawned tasks and no caching between calls
/// - No decision about whether an update is needed (owned by `DdnsEngine`)
///
/// ## Example
///
/// ```rust,ignore
/// async fn update_record(&self, record_name: &str, ip: Ipv4Addr) -> Result<()> {
///     let response = self.http_client
///         .put(format!("/domains/{}/records/A/{}", self.domain, record_name))
///         .json(&serde_json::json!([{ "data": ip.to_string(), "ttl": 3600 }]))
///         .send()
///         .await?; // Single API call
///
///     if response.status().is_success() {
///         Ok(())
///     } else {
///         Err(Error::network("update failed")) // Engine reports it, never retries
///     }
/// }
/// ```
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch every A-record currently published for the domain
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DnsRecord>)`: The records in provider order (may be empty)
    /// - `Err(Error::Network)`: Transport failure or non-2xx status
    /// - `Err(Error::Decode)`: Body is not a JSON array of records
    async fn list_records(&self) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Replace the data of one A-record with `new_ip`
    ///
    /// # Parameters
    ///
    /// - `record_name`: The record name within the domain (e.g., "www" or "@")
    /// - `new_ip`: The new IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the update (any 2xx)
    /// - `Err(Error)`: If the update failed
    async fn update_record(
        &self,
        record_name: &str,
        new_ip: Ipv4Addr,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;

    /// Whether `update_record` only logs the request instead of sending it
    ///
    /// Updates accepted in this mode are reported as skipped, never as applied.
    fn is_dry_run(&self) -> bool {
        false
    }
}
