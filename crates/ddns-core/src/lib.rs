// # ddns-core
//
// Core library for the one-shot GoDaddy dynamic DNS updater.
//
// ## Architecture Overview
//
// This library provides the decision pipeline for a single update run:
// - **IpSource**: Trait for resolving the current public address
// - **DnsProvider**: Trait for listing and updating A-records via a provider API
// - **Record selection**: INCLUDE / EXCLUDE policy over fetched record names
// - **Change decision**: IPv4-only comparison of current vs. published address
// - **Updater**: Concurrent per-record updates with isolated failures
// - **DdnsEngine**: Orchestrates resolve + fetch → decide → filter → update
// - **Reporter**: Explicit sink for run events (no global logger)
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP implementations
// 2. **Fail Before Mutating**: Resolution and fetch failures abort the run
// 3. **Isolated Updates**: One record's failure never affects another
// 4. **Library-First**: All core functionality can be used as a library

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod record;
pub mod filter;
pub mod decision;
pub mod updater;
pub mod report;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, IpVersion};
pub use engine::{DdnsEngine, RunOutcome, RunReport, RunState};
pub use config::{Credentials, DdnsConfig, EngineConfig, IpSourceConfig, ProviderConfig};
pub use error::{Error, Result};
pub use record::{DnsRecord, extract_provider_ip};
pub use filter::{SelectionMode, SelectionPolicy, filter_candidates, select_excluded, select_included};
pub use decision::{addresses_equal, require_ipv4};
pub use updater::{UpdateOutcome, update_all, update_one};
pub use report::{Reporter, RunEvent, TracingReporter};
