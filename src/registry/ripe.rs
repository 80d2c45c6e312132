//! RIPE database search client.
//!
//! One GET against the RIPE web-UI search endpoint with resource-holder and
//! abuse-contact enrichment turned on. The response carries a list of
//! database objects at `objects.object`; only `inetnum` objects contribute.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ContactRecord, JsonClient, Registry, RegistryResponse, RegistrySource, as_list, str_at};
use crate::config::RegistryConfig;

/// Fixed search flags sent ahead of the queried address.
const SEARCH_FLAGS: [(&str, &str); 5] = [
    ("abuse-contact", "true"),
    ("flags", "B"),
    ("ignore404", "true"),
    ("managed-attributes", "true"),
    ("resource-holder", "true"),
];

pub struct RipeClient {
    http: JsonClient,
    search_url: String,
    source_app: String,
}

impl RipeClient {
    pub fn new(http: JsonClient, config: &RegistryConfig) -> Self {
        Self {
            http,
            search_url: config.ripe_search_url.clone(),
            source_app: config.ripe_source_app.clone(),
        }
    }
}

#[async_trait]
impl RegistrySource for RipeClient {
    fn registry(&self) -> Registry {
        Registry::Ripe
    }

    async fn query(&self, ip: &str) -> RegistryResponse {
        let mut params: Vec<(&str, &str)> = SEARCH_FLAGS.to_vec();
        params.push(("query-string", ip));
        params.push(("sourceapp", self.source_app.as_str()));

        match self.http.get_json(Registry::Ripe, &self.search_url, &params).await {
            Ok(raw) => RegistryResponse::new(Registry::Ripe, Some(raw)),
            Err(e) => {
                warn!("IP lookup in RIPE DB has failed: {e}");
                RegistryResponse::absent(Registry::Ripe)
            }
        }
    }

    async fn contact(&self, response: &RegistryResponse) -> ContactRecord {
        match response.raw {
            Some(ref raw) => extract_contact(raw),
            None => ContactRecord::default(),
        }
    }
}

/// Organization and abuse email from a RIPE search response.
pub fn extract_contact(raw: &Value) -> ContactRecord {
    ContactRecord {
        organization: extract_organization(raw),
        abuse_email: extract_abuse_email(raw),
    }
}

fn inetnums(raw: &Value) -> impl Iterator<Item = &Value> {
    as_list(raw.get("objects").and_then(|o| o.get("object")))
        .iter()
        .filter(|obj| obj.get("type").and_then(Value::as_str) == Some("inetnum"))
}

/// `resource-holder.name` of the first `inetnum` object that has one.
pub fn extract_organization(raw: &Value) -> String {
    inetnums(raw)
        .find_map(|obj| str_at(obj, &["resource-holder", "name"]))
        .unwrap_or_default()
        .to_string()
}

/// `abuse-contact.email` of the last `inetnum` object that has one.
///
/// Every match overwrites the previous one: with several abuse contacts in
/// one response the last listed object wins.
pub fn extract_abuse_email(raw: &Value) -> String {
    let email = inetnums(raw)
        .filter_map(|obj| str_at(obj, &["abuse-contact", "email"]))
        .last()
        .unwrap_or_default();
    if !email.is_empty() {
        debug!("RIPE abuse contact => {email}");
    }
    email.to_string()
}
