//! Provider-owned DNS records and extraction of the published address

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::sync::LazyLock;
use tracing::debug;

/// Dotted-quad candidates; octet range is checked by the `Ipv4Addr` parser
static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").expect("dotted-quad pattern is valid")
});

/// A read-only snapshot of one A-record as published by the provider
///
/// Only `name` and `data` are read; any other field in the provider's
/// payload is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record name, unique within the domain's A-record set (e.g. "@", "www")
    pub name: String,
    /// Record payload, expected to contain an IPv4 literal
    pub data: String,
}

impl DnsRecord {
    /// Create a record snapshot
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// First valid IPv4 literal embedded in `data`, if any
    ///
    /// Dotted quads with an out-of-range octet are skipped and logged at debug.
    pub fn embedded_ipv4(&self) -> Option<Ipv4Addr> {
        DOTTED_QUAD.find_iter(&self.data).find_map(|m| {
            match m.as_str().parse::<Ipv4Addr>() {
                Ok(ip) => Some(ip),
                Err(_) => {
                    debug!(
                        record = %self.name,
                        candidate = m.as_str(),
                        "Skipping dotted quad that is not a valid IPv4 address"
                    );
                    None
                }
            }
        })
    }

    /// Dotted quads in `data` that are not valid IPv4 addresses
    pub fn invalid_quads(&self) -> Vec<&str> {
        DOTTED_QUAD
            .find_iter(&self.data)
            .map(|m| m.as_str())
            .filter(|quad| quad.parse::<Ipv4Addr>().is_err())
            .collect()
    }
}

/// The provider's view of "the" address
///
/// Scans `records` in order and returns the IPv4 literal found in the `data`
/// of the first record that contains one.
///
/// # Errors
///
/// [`Error::NotFound`] if no record carries an IPv4 literal.
pub fn extract_provider_ip(records: &[DnsRecord]) -> Result<Ipv4Addr> {
    records
        .iter()
        .find_map(|record| {
            let ip = record.embedded_ipv4();
            if ip.is_none() && !record.invalid_quads().is_empty() {
                debug!(
                    record = %record.name,
                    "Record carries no valid IPv4 address; trying the next one"
                );
            }
            ip
        })
        .ok_or_else(|| {
            Error::not_found(format!(
                "no IPv4 address in any of {} provider record(s)",
                records.len()
            ))
        })
}
