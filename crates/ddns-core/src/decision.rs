//! Change detection between the current and the published address

use crate::error::{Error, Result};
use std::net::{IpAddr, Ipv4Addr};

/// Narrow an address to IPv4
///
/// # Errors
///
/// [`Error::TypeMismatch`] for an IPv6 address.
pub fn require_ipv4(ip: &IpAddr) -> Result<Ipv4Addr> {
    match ip {
        IpAddr::V4(v4) => Ok(*v4),
        IpAddr::V6(v6) => Err(Error::type_mismatch(format!(
            "expected an IPv4 address, got {}",
            v6
        ))),
    }
}

/// Compare two addresses that must both be IPv4
///
/// Fails instead of returning `false` when either side is not IPv4.
pub fn addresses_equal(a: &IpAddr, b: &IpAddr) -> Result<bool> {
    Ok(require_ipv4(a)? == require_ipv4(b)?)
}
