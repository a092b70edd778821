//! Core DDNS engine
//!
//! The DdnsEngine runs the read-compare-write sequence exactly once:
//! - Resolve the current public address via IpSource
//! - Look up the domain and the "A" record via DnsProvider
//! - Compare the record target with the resolved address
//! - Rewrite the record when the two differ
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌──────────────┐      ┌─────────────┐
//! │  IpSource   │─────▶│  DdnsEngine  │◀────▶│ DnsProvider │
//! │ (current)   │      │  (run_once)  │      │ find/update │
//! └─────────────┘      └──────────────┘      └─────────────┘
//!                             │
//!                             ▼
//!                        RunOutcome
//! ```
//!
//! ## Failure policy
//!
//! Failures while resolving the address or during either lookup are logged
//! and returned as `Err`. A failed write is logged and reported as
//! [`RunOutcome::UpdateFailed`]; the caller decides whether that is fatal.

use crate::config::{RecordTarget, RunMode, UpdaterConfig};
use crate::error::Result;
use crate::traits::{DnsProvider, DomainRef, IpSource, RecordSnapshot};
use std::net::Ipv4Addr;
use tracing::{debug, error, info, warn};

/// Result of a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Record already pointed at the current address; nothing was written
    Unchanged {
        /// The current address
        ip: Ipv4Addr,
    },

    /// Record was rewritten
    Updated {
        /// Target the record had before the run
        previous: String,
        /// Target the record has now
        current: Ipv4Addr,
    },

    /// Record differs but the run was a dry run; nothing was written
    DryRun {
        /// Target the record has
        previous: String,
        /// Target it would have been given
        current: Ipv4Addr,
    },

    /// Record differs and the write failed
    UpdateFailed {
        /// Target the record still has
        previous: String,
        /// Target the write tried to set
        current: Ipv4Addr,
        /// Description of the failure
        error: String,
    },
}

impl RunOutcome {
    /// Whether a write was attempted and failed
    pub fn is_update_failure(&self) -> bool {
        matches!(self, Self::UpdateFailed { .. })
    }
}

/// Core DDNS engine
///
/// Owns one IP source and one provider and runs the sequence on demand.
/// Nothing is carried from one run to the next: the provider's stored
/// record is the only baseline.
pub struct DdnsEngine {
    /// IP source for the current address
    ip_source: Box<dyn IpSource>,

    /// DNS provider for lookups and the write
    provider: Box<dyn DnsProvider>,

    /// Record to keep in sync
    target: RecordTarget,

    /// Live or dry-run
    mode: RunMode,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        target: RecordTarget,
        mode: RunMode,
    ) -> Self {
        Self {
            ip_source,
            provider,
            target,
            mode,
        }
    }

    /// Create an engine from a validated configuration
    pub fn from_config(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: &UpdaterConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            ip_source,
            provider,
            config.target.clone(),
            config.mode,
        ))
    }

    /// Run the sequence once
    ///
    /// # Returns
    ///
    /// - `Ok(RunOutcome)`: Lookups succeeded; the outcome says what happened to the record
    /// - `Err(Error)`: Address resolution or a lookup failed (already logged)
    pub async fn run_once(&self) -> Result<RunOutcome> {
        debug!(
            "Starting run for {} in {} via {}",
            self.target.host,
            self.target.domain,
            self.provider.provider_name()
        );

        let current_ip = self.resolve_ip().await?;
        let domain = self.lookup_domain().await?;
        let record = self.lookup_record(&domain).await?;

        if record.points_to(current_ip) {
            info!("No change needed. IP is still {}", current_ip);
            return Ok(RunOutcome::Unchanged { ip: current_ip });
        }

        info!(
            "IP Change Detected! {} has {}, current is {}",
            self.provider.display_name(),
            record.target,
            current_ip
        );

        Ok(self.apply(&domain, &record, current_ip).await)
    }

    async fn resolve_ip(&self) -> Result<Ipv4Addr> {
        match self.ip_source.current().await {
            Ok(ip) => {
                debug!("Resolved {} via {}", ip, self.ip_source.source_name());
                Ok(ip)
            }
            Err(e) => {
                error!("Failed to get public IP: {}", e);
                Err(e)
            }
        }
    }

    async fn lookup_domain(&self) -> Result<DomainRef> {
        match self.provider.find_domain(&self.target.domain).await {
            Ok(domain) => {
                debug!("Found domain {}", domain);
                Ok(domain)
            }
            Err(e) if e.is_not_found() => {
                error!("{}", e);
                Err(e)
            }
            Err(e) => {
                error!("Error fetching domain ID: {}", e);
                Err(e)
            }
        }
    }

    async fn lookup_record(&self, domain: &DomainRef) -> Result<RecordSnapshot> {
        match self.provider.find_record(domain, &self.target.host).await {
            Ok(record) => {
                debug!(
                    "Found record {} (id {}) -> {}",
                    record.name, record.id, record.target
                );
                Ok(record)
            }
            Err(e) if e.is_not_found() => {
                error!("{}", e);
                Err(e)
            }
            Err(e) => {
                error!("Error fetching record ID: {}", e);
                Err(e)
            }
        }
    }

    /// Perform (or, in dry-run mode, describe) the write
    async fn apply(
        &self,
        domain: &DomainRef,
        record: &RecordSnapshot,
        new_ip: Ipv4Addr,
    ) -> RunOutcome {
        let previous = record.target.clone();

        if self.mode == RunMode::DryRun {
            warn!(
                "[DRY-RUN] Would update record {} (id {}) in {} with payload: {}",
                record.name,
                record.id,
                domain,
                serde_json::json!({ "target": new_ip.to_string() })
            );
            return RunOutcome::DryRun {
                previous,
                current: new_ip,
            };
        }

        match self.provider.update_target(domain, record, new_ip).await {
            Ok(()) => {
                info!("SUCCESS: DNS updated to {}", new_ip);
                RunOutcome::Updated {
                    previous,
                    current: new_ip,
                }
            }
            Err(e) => {
                error!(
                    "FAILED: {} API update failed - {}",
                    self.provider.display_name(),
                    e
                );
                RunOutcome::UpdateFailed {
                    previous,
                    current: new_ip,
                    error: e.to_string(),
                }
            }
        }
    }
}
