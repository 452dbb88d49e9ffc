// # IP Source Trait
//
// Defines the interface for determining the machine's current public address.
//
// ## Implementations
//
// - HTTP "what is my IP" service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let current_ip = source.current().await?;
//     println!("Current IP: {}", current_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// IP version (v4 or v6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Whether `ip` belongs to this version
    pub fn matches(&self, ip: &IpAddr) -> bool {
        match self {
            IpVersion::V4 => ip.is_ipv4(),
            IpVersion::V6 => ip.is_ipv6(),
        }
    }
}

/// Trait for IP source implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Contract
///
/// - One outbound lookup per `current()` call, no caching between calls
/// - No retries: a failure is returned to the engine, which aborts the run
/// - No background tasks
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current IP address
    /// - `Err(Error::Network)`: If the lookup failed or returned an unparseable body
    async fn current(&self) -> Result<IpAddr, crate::Error>;

    /// Get the IP version this source resolves
    ///
    /// Returns `None` if the implementation may return either version.
    fn version(&self) -> Option<IpVersion> {
        None
    }
}
