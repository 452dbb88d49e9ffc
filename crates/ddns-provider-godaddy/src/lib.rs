// # GoDaddy DNS Provider
//
// This crate provides a GoDaddy DNS provider implementation for the DDNS updater.
//
// ## Behaviour
//
// - Makes exactly one HTTP request per trait call
// - Full error propagation to the engine (no retry, no backoff)
// - HTTP timeout configured (30 seconds)
// - Status-specific error messages (401/403, 404, 429, 5xx)
// - Dry-run mode: records are read, updates are only logged
//
// ## Security Requirements
//
// - API key and secret NEVER appear in logs or Debug output
// - Credentials are validated before the provider is built
//
// ## API Reference
//
// - GoDaddy Domains API v1: https://developer.godaddy.com/doc/endpoint/domains
// - List A-records: GET `/domains/:domain/records/A`
// - Replace one A-record: PUT `/domains/:domain/records/A/:name`

use async_trait::async_trait;
use ddns_core::config::DdnsConfig;
use ddns_core::traits::DnsProvider;
use ddns_core::{Credentials, DnsRecord, Error, Result};
use serde::Serialize;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One entry of the PUT body
#[derive(Debug, Serialize)]
struct RecordData {
    data: String,
    ttl: u32,
}

/// GoDaddy DNS provider
///
/// Bound to one domain and one credential set. Holds no state between calls.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the GET request for the record list
/// - Log the intended PUT URL and payload
/// - **NOT** actually modify DNS records
pub struct GoDaddyProvider {
    /// API base URL without trailing slash
    base_url: String,

    /// Domain whose A-records are managed
    domain: String,

    /// API credentials
    /// ⚠️ NEVER log the key or secret
    credentials: Credentials,

    /// TTL sent with every update
    ttl: u32,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, skip PUT updates
    dry_run: bool,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for GoDaddyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoDaddyProvider")
            .field("base_url", &self.base_url)
            .field("domain", &self.domain)
            .field("credentials", &"<REDACTED>")
            .field("ttl", &self.ttl)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl GoDaddyProvider {
    /// Create a GoDaddy provider from the run configuration
    ///
    /// # Errors
    ///
    /// `Error::Config` if the configuration is incomplete or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        if config.provider.dry_run {
            tracing::warn!("GoDaddy provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self {
            base_url: config.provider.base_url.trim_end_matches('/').to_string(),
            domain: config.domain.clone(),
            credentials: config.credentials.clone(),
            ttl: config.provider.ttl,
            client,
            dry_run: config.provider.dry_run,
        })
    }

    fn records_url(&self) -> String {
        format!("{}/domains/{}/records/A", self.base_url, self.domain)
    }

    /// URL of one record, with the name percent-encoded as a single segment
    fn record_url(&self, record_name: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.records_url())
            .map_err(|e| Error::config(format!("Invalid provider base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::config("Provider base URL cannot carry a path"))?
            .push(record_name);
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("X-Shopper-Id", &self.credentials.shopper_id)
            .header("Authorization", self.credentials.authorization())
    }

    /// Map a non-2xx response to an error, consuming its body for context
    async fn error_for_status(&self, response: reqwest::Response, action: &str) -> Error {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        match status.as_u16() {
            401 | 403 => Error::network(format!(
                "Authentication failed: invalid API key/secret or shopper id. Status: {} - {}",
                status, error_text
            )),
            404 => Error::network(format!(
                "Domain not found: {}. Status: {} - {}",
                self.domain, status, error_text
            )),
            429 => Error::network(format!(
                "Rate limit exceeded. Status: {} - {}",
                status, error_text
            )),
            500..=599 => Error::network(format!(
                "GoDaddy server error: {} - {}",
                status, error_text
            )),
            _ => Error::network(format!("{} failed: {} - {}", action, status, error_text)),
        }
    }
}

#[async_trait]
impl DnsProvider for GoDaddyProvider {
    /// Fetch the domain's A-records
    ///
    /// ```http
    /// GET /domains/:domain/records/A
    /// X-Shopper-Id: <shopper id>
    /// Authorization: sso-key <key>:<secret>
    /// Accept: application/json
    /// ```
    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        let url = self.records_url();
        tracing::debug!("Fetching A-records from {}", url);

        let response = self
            .authorized(self.client.get(&url))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.error_for_status(response, "Record lookup").await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;
        let records: Vec<DnsRecord> = serde_json::from_str(&body)?;

        tracing::debug!("Fetched {} A-record(s) for {}", records.len(), self.domain);
        Ok(records)
    }

    /// Replace the data of one A-record
    ///
    /// ```http
    /// PUT /domains/:domain/records/A/:name
    /// Content-Type: application/json
    /// Accept: application/json
    ///
    /// [{ "data": "1.2.3.4", "ttl": 3600 }]
    /// ```
    async fn update_record(&self, record_name: &str, new_ip: Ipv4Addr) -> Result<()> {
        let url = self.record_url(record_name)?;
        let payload = [RecordData {
            data: new_ip.to_string(),
            ttl: self.ttl,
        }];

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(&payload)?
            );
            return Ok(());
        }

        tracing::debug!("Updating A-record {} -> {}", record_name, new_ip);

        let response = self
            .authorized(self.client.put(url))
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.error_for_status(response, "Record update").await);
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "godaddy"
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddns_core::{DdnsEngine, IpSource, Reporter, RunEvent, SelectionPolicy, UpdateOutcome};
    use serde_json::json;
    use std::net::IpAddr;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> DdnsConfig {
        let mut config = DdnsConfig::new(
            "example.com",
            Credentials::new("my-key", "my-secret", "12345"),
            SelectionPolicy::default(),
        );
        config.provider.base_url = format!("{}/v1/", server.uri());
        config
    }

    #[tokio::test]
    async fn lists_records_with_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/domains/example.com/records/A"))
            .and(header("X-Shopper-Id", "12345"))
            .and(header("Authorization", "sso-key my-key:my-secret"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"data": "1.2.3.4", "name": "@", "ttl": 600, "type": "A"},
                {"data": "1.2.3.4", "name": "www", "ttl": 600, "type": "A"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GoDaddyProvider::from_config(&config_for(&server)).unwrap();
        let records = provider.list_records().await.unwrap();

        assert_eq!(
            records,
            vec![DnsRecord::new("@", "1.2.3.4"), DnsRecord::new("www", "1.2.3.4")]
        );
    }

    #[tokio::test]
    async fn malformed_listing_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/domains/example.com/records/A"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"code\":"))
            .mount(&server)
            .await;

        let provider = GoDaddyProvider::from_config(&config_for(&server)).unwrap();
        assert!(matches!(
            provider.list_records().await,
            Err(Error::Decode(_))
        ));
    }

    #[tokio::test]
    async fn auth_failure_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("UNABLE_TO_AUTHENTICATE"))
            .mount(&server)
            .await;

        let provider = GoDaddyProvider::from_config(&config_for(&server)).unwrap();
        let err = provider.list_records().await.unwrap_err();

        match err {
            Error::Network(msg) => {
                assert!(msg.contains("Authentication failed"));
                assert!(msg.contains("UNABLE_TO_AUTHENTICATE"));
                assert!(!msg.contains("my-secret"));
            }
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn status_codes_map_to_messages() {
        for (status, expected) in [
            (404, "Domain not found: example.com"),
            (429, "Rate limit exceeded"),
            (502, "GoDaddy server error"),
            (422, "Record update failed"),
        ] {
            let server = MockServer::start().await;
            Mock::given(method("PUT"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let provider = GoDaddyProvider::from_config(&config_for(&server)).unwrap();
            let err = provider
                .update_record("www", Ipv4Addr::new(1, 2, 3, 4))
                .await
                .unwrap_err();
            assert!(
                matches!(&err, Error::Network(msg) if msg.contains(expected)),
                "status {} gave {:?}",
                status,
                err
            );
        }
    }

    #[tokio::test]
    async fn update_sends_data_and_ttl() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/domains/example.com/records/A/www"))
            .and(header("X-Shopper-Id", "12345"))
            .and(header("Authorization", "sso-key my-key:my-secret"))
            .and(header("Content-Type", "application/json"))
            .and(header("Accept", "application/json"))
            .and(body_json(json!([{"data": "5.6.7.8", "ttl": 3600}])))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GoDaddyProvider::from_config(&config_for(&server)).unwrap();
        provider
            .update_record("www", Ipv4Addr::new(5, 6, 7, 8))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_uses_configured_ttl() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/domains/example.com/records/A/@"))
            .and(body_json(json!([{"data": "5.6.7.8", "ttl": 600}])))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.provider.ttl = 600;
        let provider = GoDaddyProvider::from_config(&config).unwrap();
        provider
            .update_record("@", Ipv4Addr::new(5, 6, 7, 8))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn dry_run_never_sends_updates() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.provider.dry_run = true;
        let provider = GoDaddyProvider::from_config(&config).unwrap();

        assert!(provider.is_dry_run());
        provider
            .update_record("www", Ipv4Addr::new(5, 6, 7, 8))
            .await
            .unwrap();
    }

    #[test]
    fn incomplete_config_is_rejected() {
        let mut config = DdnsConfig::new(
            "example.com",
            Credentials::new("", "secret", "1"),
            SelectionPolicy::default(),
        );
        assert!(matches!(
            GoDaddyProvider::from_config(&config),
            Err(Error::Config(_))
        ));

        config.credentials.api_key = "key".to_string();
        assert!(GoDaddyProvider::from_config(&config).is_ok());
    }

    #[test]
    fn credentials_not_exposed_in_debug() {
        let config = DdnsConfig::new(
            "example.com",
            Credentials::new("secret_key_12345", "secret_value_678", "1"),
            SelectionPolicy::default(),
        );
        let provider = GoDaddyProvider::from_config(&config).unwrap();

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(!debug_str.contains("secret_value_678"));
        assert!(debug_str.contains("GoDaddyProvider"));
        assert_eq!(provider.provider_name(), "godaddy");
    }

    #[tokio::test]
    async fn record_name_is_a_single_encoded_segment() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/domains/example.com/records/A/my%20host%2Fx"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GoDaddyProvider::from_config(&config_for(&server)).unwrap();
        provider
            .update_record("my host/x", Ipv4Addr::new(5, 6, 7, 8))
            .await
            .unwrap();
    }

    struct FixedIp(Ipv4Addr);

    #[async_trait]
    impl IpSource for FixedIp {
        async fn current(&self) -> Result<IpAddr> {
            Ok(IpAddr::V4(self.0))
        }
    }

    #[derive(Default)]
    struct Collect(Mutex<Vec<RunEvent>>);

    impl Reporter for Collect {
        fn report(&self, event: &RunEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[tokio::test]
    async fn dry_run_engine_reports_skipped_updates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/domains/example.com/records/A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"data": "5.6.7.8", "name": "www", "ttl": 600, "type": "A"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.selection = SelectionPolicy::include(["www"]);
        config.provider.dry_run = true;
        let reporter = Arc::new(Collect::default());

        let engine = DdnsEngine::new(
            Box::new(FixedIp(Ipv4Addr::new(1, 2, 3, 4))),
            Box::new(GoDaddyProvider::from_config(&config).unwrap()),
            reporter.clone(),
            &config,
        )
        .unwrap();
        let report = engine.run_once().await.unwrap();

        assert_eq!(
            report.outcomes(),
            &[UpdateOutcome::Skipped {
                record: "www".to_string(),
                address: Ipv4Addr::new(1, 2, 3, 4),
            }]
        );
        let events = reporter.0.lock().unwrap();
        assert!(RunEvent::updated_records(events.iter()).is_empty());
        assert!(events.contains(&RunEvent::RecordUpdateSkipped {
            record: "www".to_string(),
            address: Ipv4Addr::new(1, 2, 3, 4),
        }));
    }
}
