//! Test doubles and common utilities for engine contract tests
//!
//! The doubles count every call so tests can assert which steps ran.

#![allow(dead_code)]

use ddns_core::config::{RecordTarget, RunMode};
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, DomainRef, IpSource, RecordSnapshot};
use ddns_core::DdnsEngine;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpSource that always answers with the same address
pub struct FixedIpSource {
    ip: Ipv4Addr,
    call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// An IpSource whose echo service is unreachable
pub struct UnreachableIpSource;

#[async_trait::async_trait]
impl IpSource for UnreachableIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        Err(Error::transport("connection refused"))
    }

    fn source_name(&self) -> &'static str {
        "unreachable"
    }
}

/// How the provider answers the update call
#[derive(Debug, Clone, Copy)]
pub enum UpdateBehavior {
    /// Accept and store the new target
    Accept,
    /// Reject with the given HTTP status
    RejectWith(u16),
}

/// Shared state of a [`MockDnsProvider`]
#[derive(Debug)]
pub struct ProviderState {
    pub domains: Vec<DomainRef>,
    pub records: Vec<RecordSnapshot>,
    pub update_behavior: UpdateBehavior,
    pub written_targets: Vec<(u64, u64, Ipv4Addr)>,
}

/// A mock DnsProvider backed by in-memory domains and records
///
/// Clones share state and counters, so a test can keep one handle while the
/// engine owns another.
#[derive(Clone)]
pub struct MockDnsProvider {
    state: Arc<Mutex<ProviderState>>,
    domain_calls: Arc<AtomicUsize>,
    record_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
}

impl MockDnsProvider {
    /// One domain ("example.com", id 7) with one "A" record ("home", id 42)
    pub fn with_record(target: &str) -> Self {
        let provider = Self::empty();
        {
            let mut state = provider.state.lock().unwrap();
            state.domains.push(DomainRef {
                id: 7,
                name: "example.com".to_string(),
            });
            state.records.push(record(42, "home", target));
        }
        provider
    }

    /// No domains and no records
    pub fn empty() -> Self {
        Self {
            state: Arc::new(Mutex::new(ProviderState {
                domains: Vec::new(),
                records: Vec::new(),
                update_behavior: UpdateBehavior::Accept,
                written_targets: Vec::new(),
            })),
            domain_calls: Arc::new(AtomicUsize::new(0)),
            record_calls: Arc::new(AtomicUsize::new(0)),
            update_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_update_behavior(&self, behavior: UpdateBehavior) {
        self.state.lock().unwrap().update_behavior = behavior;
    }

    pub fn push_domain(&self, domain: DomainRef) {
        self.state.lock().unwrap().domains.push(domain);
    }

    pub fn push_record(&self, record: RecordSnapshot) {
        self.state.lock().unwrap().records.push(record);
    }

    pub fn domain_call_count(&self) -> usize {
        self.domain_calls.load(Ordering::SeqCst)
    }

    pub fn record_call_count(&self) -> usize {
        self.record_calls.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// (domain id, record id, new target) for every accepted write
    pub fn written_targets(&self) -> Vec<(u64, u64, Ipv4Addr)> {
        self.state.lock().unwrap().written_targets.clone()
    }

    /// Current target of the record with the given id
    pub fn target_of(&self, record_id: u64) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r.id == record_id)
            .map(|r| r.target.clone())
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn find_domain(&self, domain: &str) -> Result<DomainRef> {
        self.domain_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .unwrap()
            .domains
            .iter()
            .find(|d| d.name == domain)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Domain {} not found in mock account.", domain)))
    }

    async fn find_record(&self, domain: &DomainRef, host: &str) -> Result<RecordSnapshot> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r.record_type == "A" && r.name == host)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Record '{}' not found in {}.", host, domain.name)))
    }

    async fn update_target(
        &self,
        domain: &DomainRef,
        record: &RecordSnapshot,
        new_ip: Ipv4Addr,
    ) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();

        match state.update_behavior {
            UpdateBehavior::Accept => {
                if let Some(stored) = state.records.iter_mut().find(|r| r.id == record.id) {
                    stored.target = new_ip.to_string();
                }
                state.written_targets.push((domain.id, record.id, new_ip));
                Ok(())
            }
            UpdateBehavior::RejectWith(status) => {
                Err(Error::from_status("mock", status, "record update", "rejected"))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn display_name(&self) -> &'static str {
        "Mock"
    }
}

/// Build an "A" record snapshot
pub fn record(id: u64, name: &str, target: &str) -> RecordSnapshot {
    RecordSnapshot {
        id,
        name: name.to_string(),
        record_type: "A".to_string(),
        target: target.to_string(),
    }
}

/// The target every test points at: home.example.com
pub fn home_target() -> RecordTarget {
    RecordTarget {
        domain: "example.com".to_string(),
        host: "home".to_string(),
    }
}

/// Engine wired to a fixed address and a shared handle of `provider`
pub fn engine_for(ip: Ipv4Addr, provider: &MockDnsProvider, mode: RunMode) -> DdnsEngine {
    DdnsEngine::new(
        Box::new(FixedIpSource::new(ip)),
        Box::new(provider.clone()),
        home_target(),
        mode,
    )
}

/// Formatted log output from a subscriber installed for one test
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route events on this thread into the buffer until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .with_ansi(false)
            .without_time()
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Whether some line at `level` contains `text`
    pub fn has_line(&self, level: &str, text: &str) -> bool {
        self.contents()
            .lines()
            .any(|line| line.contains(level) && line.contains(text))
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
