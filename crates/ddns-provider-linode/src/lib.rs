// # Linode DNS Provider
//
// This crate provides the Linode DNS Manager provider for the DDNS updater.
//
// ## Behavior
//
// - One HTTP request per trait method, no retries, no caching
// - Every request carries `Authorization: Bearer <token>`
// - Lookups filter server-side through the `X-Filter` header and take the
//   first result
// - Specific error handling for HTTP status codes (401/403, 404, 429, others)
// - Configurable timeout on every request
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider fails fast if token is empty
//
// ## API Reference
//
// - Linode API v4: https://techdocs.akamai.com/linode-api/reference/api
// - List Domains: GET `/domains` with `X-Filter: {"domain": "example.com"}`
// - List Records: GET `/domains/:domain_id/records` with `X-Filter: {"type": "A", "name": "home"}`
// - Update Record: PUT `/domains/:domain_id/records/:record_id` with `{"target": "1.2.3.4"}`

use async_trait::async_trait;
use ddns_core::traits::{DnsProvider, DomainRef, RecordSnapshot};
use ddns_core::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Linode API base URL
pub const LINODE_API_BASE: &str = "https://api.linode.com/v4";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "linode";

/// One page of a Linode list endpoint
#[derive(Debug, Deserialize)]
struct Page<T> {
    data: Vec<T>,
    #[serde(default)]
    results: Option<u64>,
}

impl<T> Page<T> {
    /// First entry, unless the page reports zero results
    fn into_first(self) -> Option<T> {
        if self.results == Some(0) {
            return None;
        }
        self.data.into_iter().next()
    }
}

#[derive(Debug, Deserialize)]
struct ApiDomain {
    id: u64,
    domain: String,
}

#[derive(Debug, Deserialize)]
struct ApiRecord {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    target: String,
}

impl From<ApiRecord> for RecordSnapshot {
    fn from(record: ApiRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            record_type: record.record_type,
            target: record.target,
        }
    }
}

/// Linode DNS provider
///
/// Stateless and single-shot: each method issues exactly one request.
pub struct LinodeProvider {
    /// Linode personal access token with Domains read/write scope
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for LinodeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinodeProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LinodeProvider {
    /// Create a new Linode provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Linode API token
    /// - `timeout`: Timeout applied to every request
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is empty, and a transport
    /// error if the HTTP client cannot be built.
    pub fn new(api_token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::config("Linode API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: LINODE_API_BASE.to_string(),
            client,
        })
    }

    /// Point the provider at a different API base (e.g. a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The API base URL in use
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a list endpoint with an `X-Filter` header and decode one page
    ///
    /// # API Call
    ///
    /// ```http
    /// GET <url>
    /// Authorization: Bearer <token>
    /// X-Filter: <filter>
    /// ```
    async fn get_filtered<T: DeserializeOwned>(
        &self,
        url: &str,
        filter: &Value,
        context: &str,
    ) -> Result<Page<T>> {
        tracing::debug!("{}: GET {} with filter {}", context, url, filter);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .header("X-Filter", filter.to_string())
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("{}: failed to read response: {}", context, e)))?;

        if !status.is_success() {
            return Err(Error::from_status(PROVIDER, status.as_u16(), context, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            Error::malformed(format!(
                "{}: failed to parse response: {}. Response: {}",
                context, e, text
            ))
        })
    }
}

/// Builder errors mean the request itself was invalid (e.g. a header value
/// that is not visible ASCII); everything else is a transport failure.
fn send_error(e: reqwest::Error) -> Error {
    if e.is_builder() {
        Error::config(format!("Invalid request: {}", e))
    } else {
        Error::transport(format!("HTTP request failed: {}", e))
    }
}

#[async_trait]
impl DnsProvider for LinodeProvider {
    async fn find_domain(&self, domain: &str) -> Result<DomainRef> {
        let url = format!("{}/domains", self.base_url);
        let page: Page<ApiDomain> = self
            .get_filtered(&url, &json!({ "domain": domain }), "domain lookup")
            .await?;

        let found = page
            .into_first()
            .ok_or_else(|| Error::not_found(format!("Domain {} not found in Linode account.", domain)))?;

        tracing::debug!("Found domain ID: {}", found.id);
        Ok(DomainRef {
            id: found.id,
            name: found.domain,
        })
    }

    async fn find_record(&self, domain: &DomainRef, host: &str) -> Result<RecordSnapshot> {
        let url = format!("{}/domains/{}/records", self.base_url, domain.id);
        let page: Page<ApiRecord> = self
            .get_filtered(&url, &json!({ "type": "A", "name": host }), "record lookup")
            .await?;

        let record = page.into_first().ok_or_else(|| {
            Error::not_found(format!("Record '{}' not found in {}.", host, domain.name))
        })?;

        tracing::debug!("Found record ID: {} (target {})", record.id, record.target);
        Ok(record.into())
    }

    /// # API Call
    ///
    /// ```http
    /// PUT /domains/:domain_id/records/:record_id
    /// {
    ///   "target": "1.2.3.4"
    /// }
    /// ```
    async fn update_target(
        &self,
        domain: &DomainRef,
        record: &RecordSnapshot,
        new_ip: Ipv4Addr,
    ) -> Result<()> {
        let url = format!(
            "{}/domains/{}/records/{}",
            self.base_url, domain.id, record.id
        );

        tracing::debug!("record update: PUT {} -> {}", url, new_ip);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(&json!({ "target": new_ip.to_string() }))
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::from_status(
                PROVIDER,
                status.as_u16(),
                "record update",
                &error_text,
            ));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn display_name(&self) -> &'static str {
        "Linode"
    }
}
