//! Test doubles and common utilities for engine contract tests
//!
//! These doubles script the outside world (public address, provider records,
//! per-record failures) and count calls so that tests can assert on what the
//! engine did, not only on what it returned.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::{
    Credentials, DdnsConfig, DnsProvider, DnsRecord, IpSource, Reporter, RunEvent,
    SelectionPolicy,
};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpSource that returns a fixed result
pub struct StaticIpSource {
    result: Result<IpAddr>,
    call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(ip: impl Into<IpAddr>) -> Self {
        Self {
            result: Ok(ip.into()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(error: Error) -> Self {
        Self {
            result: Err(error),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// A mock DnsProvider backed by an in-memory record set
///
/// Clones share the record set and all counters, so a test can keep one
/// handle while the engine owns another.
#[derive(Clone)]
pub struct MockDnsProvider {
    /// Published records; successful updates rewrite `data`
    records: Arc<Mutex<Vec<DnsRecord>>>,
    /// When set, list_records() fails with this error
    list_error: Arc<Mutex<Option<Error>>>,
    /// Record names whose update fails
    failing: Arc<Mutex<HashSet<String>>>,
    /// Call counter for list_records()
    list_call_count: Arc<AtomicUsize>,
    /// Every update_record() call, in call order
    update_calls: Arc<Mutex<Vec<(String, Ipv4Addr)>>>,
    /// When set, updates are accepted but never applied
    dry_run: Arc<AtomicBool>,
}

impl MockDnsProvider {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            list_error: Arc::new(Mutex::new(None)),
            failing: Arc::new(Mutex::new(HashSet::new())),
            list_call_count: Arc::new(AtomicUsize::new(0)),
            update_calls: Arc::new(Mutex::new(Vec::new())),
            dry_run: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Records named `names`, all pointing at `ip`
    pub fn with_names(names: &[&str], ip: Ipv4Addr) -> Self {
        Self::new(
            names
                .iter()
                .map(|name| DnsRecord::new(*name, ip.to_string()))
                .collect(),
        )
    }

    /// Make list_records() fail
    pub fn fail_listing(&self, error: Error) {
        *self.list_error.lock().unwrap() = Some(error);
    }

    /// Make updates of `record_name` fail
    pub fn fail_updates_of(&self, record_name: &str) {
        self.failing
            .lock()
            .unwrap()
            .insert(record_name.to_string());
    }

    /// Accept updates without applying them
    pub fn enable_dry_run(&self) {
        self.dry_run.store(true, Ordering::SeqCst);
    }

    /// Get the number of times list_records() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.update_calls.lock().unwrap().len()
    }

    /// Names passed to update_record(), in call order
    pub fn updated_records(&self) -> Vec<String> {
        self.update_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Current snapshot of the published records
    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.list_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.records())
    }

    async fn update_record(&self, record_name: &str, new_ip: Ipv4Addr) -> Result<()> {
        self.update_calls
            .lock()
            .unwrap()
            .push((record_name.to_string(), new_ip));

        if self.failing.lock().unwrap().contains(record_name) {
            return Err(Error::network(format!(
                "connection reset while updating {}",
                record_name
            )));
        }

        if self.is_dry_run() {
            return Ok(());
        }

        for record in self.records.lock().unwrap().iter_mut() {
            if record.name == record_name {
                record.data = new_ip.to_string();
            }
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run.load(Ordering::SeqCst)
    }
}

/// A Reporter that keeps every event
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn contains(&self, event: &RunEvent) -> bool {
        self.events.lock().unwrap().contains(event)
    }

    /// Failure events for record updates, as (record, cause)
    pub fn update_failures(&self) -> Vec<(String, String)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                RunEvent::RecordUpdateFailed { record, cause } => {
                    Some((record.clone(), cause.clone()))
                }
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &RunEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(selection: SelectionPolicy) -> DdnsConfig {
    DdnsConfig::new(
        "example.com",
        Credentials::new("test-key", "test-secret", "12345"),
        selection,
    )
}

pub fn ip(a: u8, b: u8, c: u8, d: u8) -> Ipv4Addr {
    Ipv4Addr::new(a, b, c, d)
}
