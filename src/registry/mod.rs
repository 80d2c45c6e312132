//! Regional internet registry sources.
//!
//! Each registry implements `RegistrySource`: a network `query` that yields
//! the raw JSON (or nothing) and a `contact` step that extracts the
//! organization / abuse-email pair from it. Failures never cross this
//! boundary; they are logged and turned into absent JSON or empty strings.
//!
//! Sources:
//!   - `RipeClient`: one search call, pure extraction
//!   - `ArinClient`: IP lookup, then PoC follow-ups for the abuse email

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

pub mod arin;
pub mod http;
pub mod ripe;

pub use arin::ArinClient;
pub use http::JsonClient;
pub use ripe::RipeClient;

/// Registries the orchestrator knows about, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Registry {
    Ripe,
    Arin,
}

impl std::fmt::Display for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Registry::Ripe => "RIPE",
            Registry::Arin => "ARIN",
        })
    }
}

/// Raw answer of one registry; `raw` is `None` when the call or the JSON
/// decoding failed.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryResponse {
    pub source: Registry,
    pub raw: Option<Value>,
}

impl RegistryResponse {
    pub fn new(source: Registry, raw: Option<Value>) -> Self {
        Self { source, raw }
    }

    pub fn absent(source: Registry) -> Self {
        Self { source, raw: None }
    }
}

/// Organization and abuse email; empty string means unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRecord {
    pub organization: String,
    pub abuse_email: String,
}

impl ContactRecord {
    pub fn new(organization: impl Into<String>, abuse_email: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            abuse_email: abuse_email.into(),
        }
    }

    pub fn has_email(&self) -> bool {
        !self.abuse_email.is_empty()
    }
}

/// Trait every registry source implements.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    fn registry(&self) -> Registry;

    /// Fetch the registry's JSON for `ip`.
    async fn query(&self, ip: &str) -> RegistryResponse;

    /// Extract the contact pair from a previously fetched response.
    async fn contact(&self, response: &RegistryResponse) -> ContactRecord;

    async fn lookup(&self, ip: &str) -> ContactRecord {
        let response = self.query(ip).await;
        self.contact(&response).await
    }
}

/// Walk `path` through nested objects and return the string at the end.
/// Any missing segment or non-string leaf yields `None`.
pub(crate) fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |node, key| node.get(key))
        .and_then(Value::as_str)
}

/// View a JSON node as a list: arrays as-is, a lone object as a one-element
/// list, anything else as empty.
pub(crate) fn as_list(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items.as_slice(),
        Some(v @ Value::Object(_)) => std::slice::from_ref(v),
        _ => &[],
    }
}
