//! Shared HTTP transport for the registry clients.

use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;

use super::Registry;
use crate::config::NetworkConfig;
use crate::errors::{EnricherError, Result};

/// Thin wrapper over a reusable `reqwest::Client` that fetches JSON documents.
#[derive(Clone)]
pub struct JsonClient {
    client: reqwest::Client,
}

impl JsonClient {
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(network.user_agent.as_str());
        if let Some(timeout) = network.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| EnricherError::configuration(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// GET `url` (plus `query` pairs) with `Accept: application/json` and
    /// decode the body. Transport errors, non-success statuses and invalid
    /// JSON all map to `EnricherError::RegistryQuery`.
    pub async fn get_json(
        &self,
        registry: Registry,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value> {
        debug!("(cmd) curl -H 'Accept: application/json' {url} {query:?}");

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| EnricherError::registry_query(registry, url, e.to_string()))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| EnricherError::registry_query(registry, url, format!("invalid JSON: {e}")))
    }
}
