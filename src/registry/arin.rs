//! ARIN Whois-RWS client.
//!
//! Stage 1 looks the address up (`/ip/{ip}`) and yields the organization.
//! Stage 2 follows `net.parentNetRef` to the owning org's points of contact
//! (`/net/{handle}/org/pocs`), picks the "Abuse" PoC and reads its email
//! (`/poc/{handle}`). Each call is contained on its own: a stage-2 failure
//! only costs the email.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ContactRecord, JsonClient, Registry, RegistryResponse, RegistrySource, as_list, str_at};
use crate::config::RegistryConfig;

pub struct ArinClient {
    http: JsonClient,
    ip_url: String,
    rest_url: String,
}

impl ArinClient {
    pub fn new(http: JsonClient, config: &RegistryConfig) -> Self {
        Self {
            http,
            ip_url: config.arin_ip_url.trim_end_matches('/').to_string(),
            rest_url: config.arin_rest_url.trim_end_matches('/').to_string(),
        }
    }

    /// Stage 2: parent net → org PoCs → abuse PoC → email.
    async fn abuse_email(&self, net: &Value) -> String {
        let Some(net_handle) = parent_net_handle(net) else {
            debug!("ARIN response has no parentNetRef handle");
            return String::new();
        };

        let pocs_url = format!("{}/net/{net_handle}/org/pocs", self.rest_url);
        let pocs = match self.http.get_json(Registry::Arin, &pocs_url, &[]).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Extraction of ARIN abuse email has failed: {e}");
                return String::new();
            }
        };

        let Some(poc_handle) = abuse_poc_handle(&pocs) else {
            debug!("no Abuse PoC listed for {net_handle}");
            return String::new();
        };

        let poc_url = format!("{}/poc/{poc_handle}", self.rest_url);
        debug!("Abuse contact url {poc_url}");
        match self.http.get_json(Registry::Arin, &poc_url, &[]).await {
            Ok(poc) => extract_poc_email(&poc),
            Err(e) => {
                warn!("Extraction of abuse contact from {poc_url} has failed: {e}");
                String::new()
            }
        }
    }
}

#[async_trait]
impl RegistrySource for ArinClient {
    fn registry(&self) -> Registry {
        Registry::Arin
    }

    async fn query(&self, ip: &str) -> RegistryResponse {
        let url = format!("{}/ip/{ip}", self.ip_url);
        match self.http.get_json(Registry::Arin, &url, &[]).await {
            Ok(raw) => RegistryResponse::new(Registry::Arin, Some(raw)),
            Err(e) => {
                warn!("IP lookup in ARIN DB has failed: {e}");
                RegistryResponse::absent(Registry::Arin)
            }
        }
    }

    async fn contact(&self, response: &RegistryResponse) -> ContactRecord {
        let Some(ref raw) = response.raw else {
            return ContactRecord::default();
        };
        ContactRecord {
            organization: extract_organization(raw),
            abuse_email: self.abuse_email(raw).await,
        }
    }
}

/// `net.orgRef["@name"]` or empty.
pub fn extract_organization(raw: &Value) -> String {
    str_at(raw, &["net", "orgRef", "@name"])
        .unwrap_or_default()
        .to_string()
}

/// `net.parentNetRef["@handle"]`, when present.
pub fn parent_net_handle(raw: &Value) -> Option<&str> {
    str_at(raw, &["net", "parentNetRef", "@handle"])
}

/// Handle of the first `pocs.pocLinkRef` entry described as "Abuse".
pub fn abuse_poc_handle(pocs: &Value) -> Option<&str> {
    as_list(pocs.get("pocs").and_then(|p| p.get("pocLinkRef")))
        .iter()
        .filter(|link| link.get("@description").and_then(Value::as_str) == Some("Abuse"))
        .find_map(|link| link.get("@handle").and_then(Value::as_str))
}

/// `poc.emails.email["$"]` or empty. A list of emails contributes its first.
pub fn extract_poc_email(poc: &Value) -> String {
    let emails = poc
        .get("poc")
        .and_then(|p| p.get("emails"))
        .and_then(|e| e.get("email"));
    as_list(emails)
        .first()
        .and_then(|email| email.get("$"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
