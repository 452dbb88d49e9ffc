//! Per-record updates with isolated failures
//!
//! Every candidate gets exactly one update attempt. All attempts are started
//! before any is awaited, and the group completes only when every attempt has
//! finished. A failed attempt becomes an [`UpdateOutcome::Failed`]; it never
//! cancels or short-circuits its siblings.

use crate::error::Error;
use crate::report::{Reporter, RunEvent};
use crate::traits::DnsProvider;
use futures::future::join_all;
use std::net::Ipv4Addr;
use tracing::debug;

/// Result of one record update attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The provider accepted the new address
    Updated { record: String, address: Ipv4Addr },
    /// Dry run: the update was logged but not sent
    Skipped { record: String, address: Ipv4Addr },
    /// The attempt failed; final for this run
    Failed { record: String, cause: Error },
}

impl UpdateOutcome {
    pub fn record(&self) -> &str {
        match self {
            UpdateOutcome::Updated { record, .. }
            | UpdateOutcome::Skipped { record, .. }
            | UpdateOutcome::Failed { record, .. } => record,
        }
    }

    /// Whether the attempt did not fail (applied or skipped)
    pub fn is_success(&self) -> bool {
        !matches!(self, UpdateOutcome::Failed { .. })
    }

    fn to_event(&self) -> RunEvent {
        match self {
            UpdateOutcome::Updated { record, address } => RunEvent::RecordUpdated {
                record: record.clone(),
                address: *address,
            },
            UpdateOutcome::Skipped { record, address } => RunEvent::RecordUpdateSkipped {
                record: record.clone(),
                address: *address,
            },
            UpdateOutcome::Failed { record, cause } => RunEvent::RecordUpdateFailed {
                record: record.clone(),
                cause: cause.to_string(),
            },
        }
    }
}

/// Attempt a single record update
///
/// Never returns an error: provider failures are captured in the outcome.
/// A dry-run provider yields [`UpdateOutcome::Skipped`] on success.
pub async fn update_one(
    provider: &dyn DnsProvider,
    record_name: &str,
    new_ip: Ipv4Addr,
) -> UpdateOutcome {
    debug!(
        "Sending update for {} -> {} via {}",
        record_name,
        new_ip,
        provider.provider_name()
    );

    match provider.update_record(record_name, new_ip).await {
        Ok(()) if provider.is_dry_run() => UpdateOutcome::Skipped {
            record: record_name.to_string(),
            address: new_ip,
        },
        Ok(()) => UpdateOutcome::Updated {
            record: record_name.to_string(),
            address: new_ip,
        },
        Err(cause) => UpdateOutcome::Failed {
            record: record_name.to_string(),
            cause,
        },
    }
}

/// Update every candidate concurrently and report each outcome
///
/// Each outcome is reported as soon as its attempt completes; the returned
/// vector is in the iteration order of `candidates`.
pub async fn update_all<'a, I>(
    provider: &dyn DnsProvider,
    candidates: I,
    new_ip: Ipv4Addr,
    reporter: &dyn Reporter,
) -> Vec<UpdateOutcome>
where
    I: IntoIterator<Item = &'a String>,
{
    let attempts = candidates.into_iter().map(|record_name| async move {
        let outcome = update_one(provider, record_name, new_ip).await;
        reporter.report(&outcome.to_event());
        outcome
    });

    join_all(attempts).await
}
