// # DNS Provider Trait
//
// Defines the interface for reading and rewriting a DNS "A" record through a
// provider API.
//
// ## Implementations
//
// - Linode: `ddns-provider-linode` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// let domain = provider.find_domain("example.com").await?;
// let record = provider.find_record(&domain, "home").await?;
// provider.update_target(&domain, &record, "5.6.7.8".parse()?).await?;
// ```

use async_trait::async_trait;
use std::fmt;
use std::net::Ipv4Addr;

/// A domain as known to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRef {
    /// Provider-assigned identifier
    pub id: u64,
    /// Domain name (e.g., "example.com")
    pub name: String,
}

impl fmt::Display for DomainRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {})", self.name, self.id)
    }
}

/// Snapshot of a DNS record as returned by the record lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSnapshot {
    /// Provider-assigned identifier
    pub id: u64,
    /// Host name within the domain (e.g., "home")
    pub name: String,
    /// Record type, "A" for everything this crate touches
    pub record_type: String,
    /// Current target as reported by the provider
    pub target: String,
}

impl RecordSnapshot {
    /// The current target as an IPv4 address, if it is one
    pub fn target_ip(&self) -> Option<Ipv4Addr> {
        self.target.trim().parse().ok()
    }

    /// Whether the record already points at `ip`
    ///
    /// A target that is not a dotted quad never matches.
    pub fn points_to(&self, ip: Ipv4Addr) -> bool {
        self.target_ip() == Some(ip)
    }
}

/// Trait for DNS provider implementations
///
/// Each method is a single API call. Providers never retry, never cache
/// between calls, and never decide whether an update is needed.
///
/// # Filters
///
/// Lookups are exact-match filters. When several entries match, the first
/// one returned wins.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up the provider's identifier for a domain name
    ///
    /// # Returns
    ///
    /// - `Ok(DomainRef)`: The first matching domain
    /// - `Err(Error::NotFound)`: The filter matched nothing
    /// - `Err(Error)`: Transport, status, or malformed-response failure
    async fn find_domain(&self, domain: &str) -> Result<DomainRef, crate::Error>;

    /// Look up the "A" record with the given host name inside `domain`
    ///
    /// # Returns
    ///
    /// - `Ok(RecordSnapshot)`: The first matching record
    /// - `Err(Error::NotFound)`: The filter matched nothing
    /// - `Err(Error)`: Transport, status, or malformed-response failure
    async fn find_record(
        &self,
        domain: &DomainRef,
        host: &str,
    ) -> Result<RecordSnapshot, crate::Error>;

    /// Point `record` at `new_ip`
    async fn update_target(
        &self,
        domain: &DomainRef,
        record: &RecordSnapshot,
        new_ip: Ipv4Addr,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;

    /// Name used in user-facing log lines (e.g. "Linode")
    fn display_name(&self) -> &'static str {
        self.provider_name()
    }
}
