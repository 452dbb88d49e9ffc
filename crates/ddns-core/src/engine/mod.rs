//! Core DDNS engine
//!
//! The DdnsEngine drives one update run:
//! - Resolving the current public address via IpSource
//! - Fetching the published A-records via DnsProvider
//! - Deciding whether the published address is stale
//! - Selecting candidate records and updating them concurrently
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐        ┌──────────────┐
//! │  IpSource   │        │ DnsProvider  │
//! │ (current)   │        │ (list)       │
//! └─────────────┘        └──────────────┘
//!        │      join both       │
//!        └──────────┬───────────┘
//!                   ▼
//!          ┌──────────────────┐
//!          │ decide (equal?)  │── yes ──▶ Done
//!          └──────────────────┘
//!                   │ no
//!                   ▼
//!          ┌──────────────────┐      ┌──────────────┐
//!          │ filter → update  │─────▶│ DnsProvider  │ × N, join all
//!          └──────────────────┘      │ (update)     │
//!                                    └──────────────┘
//! ```
//!
//! ## States
//!
//! `Idle → Resolving → Deciding → (Done | Filtering → Updating → Done)`,
//! with any resolution, fetch or decision failure ending in `Failed`.

use crate::config::DdnsConfig;
use crate::decision::{addresses_equal, require_ipv4};
use crate::error::{Error, Result};
use crate::filter::{SelectionPolicy, filter_candidates};
use crate::record::extract_provider_ip;
use crate::report::{Reporter, RunEvent};
use crate::traits::{DnsProvider, IpSource};
use crate::updater::{UpdateOutcome, update_all};
use chrono::{DateTime, Utc};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tracing::debug;

/// Position of a run in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Resolving,
    Deciding,
    Filtering,
    Updating,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Resolving => "resolving",
            RunState::Deciding => "deciding",
            RunState::Filtering => "filtering",
            RunState::Updating => "updating",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Published address already matched; nothing was sent
    Unchanged { address: Ipv4Addr },

    /// Address changed; one outcome per candidate record
    Updated {
        previous: Ipv4Addr,
        current: Ipv4Addr,
        outcomes: Vec<UpdateOutcome>,
    },
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RunOutcome,
}

impl RunReport {
    /// Outcomes of all update attempts (empty when unchanged)
    pub fn outcomes(&self) -> &[UpdateOutcome] {
        match &self.outcome {
            RunOutcome::Unchanged { .. } => &[],
            RunOutcome::Updated { outcomes, .. } => outcomes.as_slice(),
        }
    }

    /// Attempts that failed
    pub fn failed_updates(&self) -> Vec<&UpdateOutcome> {
        self.outcomes().iter().filter(|o| !o.is_success()).collect()
    }

    /// Whether any record update failed
    pub fn has_failures(&self) -> bool {
        self.outcomes().iter().any(|o| !o.is_success())
    }

    /// Wall-clock duration of the run
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.signed_duration_since(self.started_at)
    }
}

/// Core DDNS engine
///
/// The engine owns one IP source, one provider and a reporter, and performs
/// a single pass per [`DdnsEngine::run_once()`] call. It holds no state
/// between runs.
///
/// ## Concurrency
///
/// The address lookup and the record fetch are started together and both
/// awaited before any decision is made. Record updates are fanned out the
/// same way. Nothing is cancelled once started.
pub struct DdnsEngine {
    /// IP source for the current public address
    ip_source: Box<dyn IpSource>,

    /// DNS provider for reading and updating records
    provider: Box<dyn DnsProvider>,

    /// Sink for run events
    reporter: Arc<dyn Reporter>,

    /// Domain being managed (for reporting)
    domain: String,

    /// Candidate selection policy
    selection: SelectionPolicy,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation, bound to `config.domain`
    /// - `reporter`: Event sink
    /// - `config`: DDNS configuration
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        reporter: Arc<dyn Reporter>,
        config: &DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_source,
            provider,
            reporter,
            domain: config.domain.clone(),
            selection: config.selection.clone(),
        })
    }

    /// Perform one update pass
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: No change was needed, or updates were attempted
    ///   (individual record failures live inside the report)
    /// - `Err(Error)`: Resolution, fetch or decision failed; nothing was updated
    pub async fn run_once(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        let mut state = RunState::Idle;

        self.emit_event(RunEvent::Started {
            domain: self.domain.clone(),
        });

        self.transition(&mut state, RunState::Resolving);
        let (current, records) =
            tokio::join!(self.ip_source.current(), self.provider.list_records());

        if let Err(e) = &current {
            self.emit_event(RunEvent::ResolutionFailed {
                error: e.to_string(),
            });
        }
        if let Err(e) = &records {
            self.emit_event(RunEvent::FetchFailed {
                error: e.to_string(),
            });
        }
        let (current, records) = match (current, records) {
            (Ok(current), Ok(records)) => (current, records),
            (Err(e), _) | (_, Err(e)) => return Err(self.fail(&mut state, e)),
        };
        debug!(
            "Resolved {} and fetched {} record(s) from {}",
            current,
            records.len(),
            self.provider.provider_name()
        );

        self.transition(&mut state, RunState::Deciding);
        let previous = match extract_provider_ip(&records) {
            Ok(ip) => ip,
            Err(e) => {
                self.emit_event(RunEvent::NoProviderAddress {
                    error: e.to_string(),
                });
                return Err(self.fail(&mut state, e));
            }
        };

        let unchanged = addresses_equal(&current, &IpAddr::V4(previous))
            .map_err(|e| self.fail(&mut state, e))?;
        if unchanged {
            self.emit_event(RunEvent::AddressUnchanged { address: previous });
            self.emit_event(RunEvent::Finished {
                attempted: 0,
                failed: 0,
            });
            self.transition(&mut state, RunState::Done);
            return Ok(RunReport {
                started_at,
                finished_at: Utc::now(),
                outcome: RunOutcome::Unchanged { address: previous },
            });
        }

        let current = require_ipv4(&current).map_err(|e| self.fail(&mut state, e))?;
        self.emit_event(RunEvent::AddressChanged { previous, current });

        self.transition(&mut state, RunState::Filtering);
        let mut candidates: Vec<String> = filter_candidates(&records, &self.selection)
            .into_iter()
            .collect();
        candidates.sort();
        if candidates.is_empty() {
            self.emit_event(RunEvent::NoCandidates);
        }

        self.transition(&mut state, RunState::Updating);
        let outcomes = update_all(
            self.provider.as_ref(),
            &candidates,
            current,
            self.reporter.as_ref(),
        )
        .await;

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        self.emit_event(RunEvent::Finished {
            attempted: outcomes.len(),
            failed,
        });
        self.transition(&mut state, RunState::Done);

        Ok(RunReport {
            started_at,
            finished_at: Utc::now(),
            outcome: RunOutcome::Updated {
                previous,
                current,
                outcomes,
            },
        })
    }

    fn transition(&self, state: &mut RunState, next: RunState) {
        debug!("Run state: {} -> {}", state, next);
        *state = next;
    }

    fn fail(&self, state: &mut RunState, error: Error) -> Error {
        self.transition(state, RunState::Failed);
        error
    }

    fn emit_event(&self, event: RunEvent) {
        self.reporter.report(&event);
    }
}
