//! Contact resolution across registries.
//!
//! RIPE is asked first, ARIN second. The pair that is returned is chosen by
//! email alone: RIPE's pair when RIPE produced an abuse email, ARIN's pair
//! otherwise. Organizations are never mixed between registries, so an empty
//! RIPE organization can win over a populated ARIN one.

use tracing::info;

use crate::config::Config;
use crate::errors::Result;
use crate::registry::{
    ArinClient, ContactRecord, JsonClient, Registry, RegistrySource, RipeClient,
};

/// Capability used by the enricher: IP string in, contact pair out.
#[async_trait::async_trait]
pub trait ContactLookup: Send + Sync {
    async fn resolve_contact(&self, ip: &str) -> ResolvedContact;
}

/// Final pair plus the registry it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContact {
    pub contact: ContactRecord,
    pub source: Registry,
}

/// Pick the final pair from the RIPE and ARIN pairs.
pub fn merge_contacts(ripe: ContactRecord, arin: ContactRecord) -> ResolvedContact {
    if ripe.has_email() {
        ResolvedContact {
            contact: ripe,
            source: Registry::Ripe,
        }
    } else {
        ResolvedContact {
            contact: arin,
            source: Registry::Arin,
        }
    }
}

/// Queries RIPE then ARIN for every address.
pub struct ContactResolver<R = RipeClient, A = ArinClient> {
    ripe: R,
    arin: A,
}

impl ContactResolver {
    /// Wire the public registry clients from `config`, sharing one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = JsonClient::new(&config.network)?;
        Ok(Self::new(
            RipeClient::new(http.clone(), &config.registry),
            ArinClient::new(http, &config.registry),
        ))
    }
}

impl<R: RegistrySource, A: RegistrySource> ContactResolver<R, A> {
    pub fn new(ripe: R, arin: A) -> Self {
        Self { ripe, arin }
    }
}

#[async_trait::async_trait]
impl<R: RegistrySource, A: RegistrySource> ContactLookup for ContactResolver<R, A> {
    async fn resolve_contact(&self, ip: &str) -> ResolvedContact {
        info!("IP {ip}");

        let ripe = self.ripe.lookup(ip).await;
        let arin = self.arin.lookup(ip).await;

        info!("{}: {}, {}", self.ripe.registry(), ripe.organization, ripe.abuse_email);
        info!("{}: {}, {}", self.arin.registry(), arin.organization, arin.abuse_email);

        merge_contacts(ripe, arin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryResponse;
    use async_trait::async_trait;
    use serde_json::Value;

    /// Source that answers with a fixed pair, or with nothing when `None`.
    struct Canned {
        registry: Registry,
        pair: Option<(&'static str, &'static str)>,
    }

    #[async_trait]
    impl RegistrySource for Canned {
        fn registry(&self) -> Registry {
            self.registry
        }

        async fn query(&self, _ip: &str) -> RegistryResponse {
            let raw = self
                .pair
                .map(|(org, email)| serde_json::json!({"org": org, "email": email}));
            RegistryResponse::new(self.registry, raw)
        }

        async fn contact(&self, response: &RegistryResponse) -> ContactRecord {
            let Some(ref raw) = response.raw else {
                return ContactRecord::default();
            };
            let org = raw.get("org").and_then(Value::as_str).unwrap_or_default();
            let email = raw.get("email").and_then(Value::as_str).unwrap_or_default();
            ContactRecord::new(org, email)
        }
    }

    fn resolver(
        ripe: Option<(&'static str, &'static str)>,
        arin: Option<(&'static str, &'static str)>,
    ) -> ContactResolver<Canned, Canned> {
        ContactResolver::new(
            Canned {
                registry: Registry::Ripe,
                pair: ripe,
            },
            Canned {
                registry: Registry::Arin,
                pair: arin,
            },
        )
    }

    #[tokio::test]
    async fn ripe_wins_when_it_has_an_email() {
        let r = resolver(Some(("OrgA", "abuse@a")), Some(("OrgB", "abuse@b")))
            .resolve_contact("192.0.2.1")
            .await;
        assert_eq!(r.contact, ContactRecord::new("OrgA", "abuse@a"));
        assert_eq!(r.source, Registry::Ripe);
    }

    #[tokio::test]
    async fn ripe_pair_kept_whole_even_without_org() {
        let r = resolver(Some(("", "abuse@a")), Some(("OrgB", "abuse@b")))
            .resolve_contact("192.0.2.1")
            .await;
        assert_eq!(r.contact, ContactRecord::new("", "abuse@a"));
    }

    #[tokio::test]
    async fn arin_replaces_ripe_without_email() {
        let r = resolver(Some(("OrgA", "")), Some(("OrgB", "abuse@b")))
            .resolve_contact("192.0.2.1")
            .await;
        assert_eq!(r.contact, ContactRecord::new("OrgB", "abuse@b"));
        assert_eq!(r.source, Registry::Arin);
    }

    #[tokio::test]
    async fn arin_pair_returned_verbatim_even_if_empty() {
        let r = resolver(Some(("OrgA", "")), Some(("", "")))
            .resolve_contact("192.0.2.1")
            .await;
        assert_eq!(r.contact, ContactRecord::default());
    }

    #[tokio::test]
    async fn both_absent_is_empty() {
        let r = resolver(None, None).resolve_contact("192.0.2.1").await;
        assert_eq!(r.contact, ContactRecord::default());
    }

    #[test]
    fn sources_keep_their_registry_order() {
        let r = resolver(None, None);
        assert_eq!(r.ripe.registry(), Registry::Ripe);
        assert_eq!(r.arin.registry(), Registry::Arin);
    }

    #[test]
    fn merge_is_deterministic() {
        let a = merge_contacts(
            ContactRecord::new("OrgA", "abuse@a"),
            ContactRecord::new("OrgB", "abuse@b"),
        );
        let b = merge_contacts(
            ContactRecord::new("OrgA", "abuse@a"),
            ContactRecord::new("OrgB", "abuse@b"),
        );
        assert_eq!(a, b);
    }
}
