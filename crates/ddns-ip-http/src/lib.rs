// # HTTP IP Source
//
// This crate provides the IP resolver for the DDNS updater.
//
// ## Architecture
//
// Asks a public "what is my IP" service for the caller's external address.
// The service must answer `GET <url>` with a JSON body of the form
// `{"ip": "<dotted-quad>"}`, which is what https://api.ipify.org returns for
// `?format=json`.
//
// One request per run, bounded by a 10 second timeout, never retried.

use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use serde::Deserialize;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default IP echo service
pub const DEFAULT_IP_ECHO_URL: &str = "https://api.ipify.org?format=json";

/// Timeout for the echo request
pub const IP_ECHO_TIMEOUT: Duration = Duration::from_secs(10);

/// Body returned by the echo service
#[derive(Debug, Deserialize)]
struct EchoResponse {
    ip: String,
}

/// HTTP-based IP source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: Echo service URL (e.g., "https://api.ipify.org?format=json")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(IP_ECHO_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create a source for [`DEFAULT_IP_ECHO_URL`]
    pub fn with_default_url() -> Result<Self> {
        Self::new(DEFAULT_IP_ECHO_URL)
    }

    /// The URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch current IP from the echo service
    async fn fetch_ip(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::provider("ip-echo", status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        parse_echo_body(&body)
    }
}

/// Extract the IPv4 address from an echo-service body
fn parse_echo_body(body: &str) -> Result<Ipv4Addr> {
    let echo: EchoResponse = serde_json::from_str(body)
        .map_err(|e| Error::malformed(format!("Invalid echo response: {}. Body: {}", e, body)))?;

    let ip_text = echo.ip.trim();
    ip_text
        .parse()
        .map_err(|_| Error::malformed(format!("Not an IPv4 address: {}", ip_text)))
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        let ip = self.fetch_ip().await?;
        tracing::debug!("Echo service {} reported {}", self.url, ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
