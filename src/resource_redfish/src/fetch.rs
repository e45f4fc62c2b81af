use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{config::Credentials, endpoint::Endpoint, error::FetchError};

/// Resolves one endpoint to the JSON document it describes.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, FetchError>;
}

/// Talks to a real management controller over HTTPS.
#[derive(Debug, Clone)]
pub struct RedfishClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl RedfishClient {
    /// Certificate validation is off: controllers ship with self-signed certificates.
    pub fn new(base_url: &str, credentials: Credentials) -> anyhow::Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(RedfishClient {
            http,
            base_url: base_url.to_string(),
            credentials,
        })
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl Fetcher for RedfishClient {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, FetchError> {
        let url = self.url(endpoint);
        debug!(%url, "GET");

        let response = match self
            .http
            .get(&url)
            .basic_auth(self.credentials.user(), Some(self.credentials.password()))
            .send()
            .await
        {
            Ok(response) => response,
            Err(source) => return Err(FetchError::Transport { url, source }),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(source) => return Err(FetchError::Transport { url, source }),
        };
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }
}

/// Never touches the network; every endpoint resolves to a synthetic document.
#[derive(Debug, Clone, Default)]
pub struct SimulatedFetcher;

#[async_trait]
impl Fetcher for SimulatedFetcher {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, FetchError> {
        info!(%endpoint, "[TEST MODE] simulating request");
        Ok(simulated_document(endpoint))
    }
}

pub fn simulated_document(endpoint: &Endpoint) -> Value {
    json!({
        "endpoint": endpoint.path(),
        "simulation_mode": true,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}
