//! Run reporting
//!
//! Components never log outcomes through a global; they receive a
//! [`Reporter`] and emit [`RunEvent`]s into it. [`TracingReporter`] is the
//! production sink.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use tracing::{error, info, warn};

/// Events emitted during one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Run started for a domain
    Started { domain: String },

    /// Current public address could not be determined
    ResolutionFailed { error: String },

    /// Provider records could not be fetched
    FetchFailed { error: String },

    /// No provider record carries an IPv4 address
    NoProviderAddress { error: String },

    /// Current address matches the published one
    AddressUnchanged { address: Ipv4Addr },

    /// Current address differs from the published one
    AddressChanged {
        previous: Ipv4Addr,
        current: Ipv4Addr,
    },

    /// Policy selected no record for update
    NoCandidates,

    /// A record now points at `address`
    RecordUpdated { record: String, address: Ipv4Addr },

    /// Dry run: the record would have been pointed at `address`
    RecordUpdateSkipped { record: String, address: Ipv4Addr },

    /// A record could not be updated
    RecordUpdateFailed { record: String, cause: String },

    /// Run finished
    Finished {
        attempted: usize,
        failed: usize,
    },
}

/// Sink for run events
pub trait Reporter: Send + Sync {
    fn report(&self, event: &RunEvent);
}

/// Reporter that turns every event into one tracing line
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &RunEvent) {
        match event {
            RunEvent::Started { domain } => {
                info!(domain = %domain, "Checking A-records");
            }
            RunEvent::ResolutionFailed { error } => {
                error!("Failed to retrieve the public IP address: {}", error);
            }
            RunEvent::FetchFailed { error } => {
                error!("Failed to retrieve the DNS records: {}", error);
            }
            RunEvent::NoProviderAddress { error } => {
                error!("No IP address could be retrieved from the provider: {}", error);
            }
            RunEvent::AddressUnchanged { address } => {
                info!(%address, "The IP did not change, no record will be updated");
            }
            RunEvent::AddressChanged { previous, current } => {
                info!(%previous, %current, "IP address changed");
            }
            RunEvent::NoCandidates => {
                warn!("IP address changed but no record matched the selection policy");
            }
            RunEvent::RecordUpdated { record, address } => {
                info!("DNS record {} now has the IP address {}", record, address);
            }
            RunEvent::RecordUpdateSkipped { record, address } => {
                info!("[DRY-RUN] Would update DNS record {} to the IP address {}", record, address);
            }
            RunEvent::RecordUpdateFailed { record, cause } => {
                warn!("Was not able to change the IP of record {}: {}", record, cause);
            }
            RunEvent::Finished { attempted, failed } => {
                if *failed > 0 {
                    warn!(attempted, failed, "Run finished with failed record updates");
                } else {
                    info!(attempted, "Run finished");
                }
            }
        }
    }
}

impl RunEvent {
    /// Record names mentioned by update events in `events`
    pub fn updated_records<'a>(events: impl IntoIterator<Item = &'a RunEvent>) -> HashSet<String> {
        events
            .into_iter()
            .filter_map(|event| match event {
                RunEvent::RecordUpdated { record, .. } => Some(record.clone()),
                _ => None,
            })
            .collect()
    }
}
