/*!
Hostname → IP resolution.

- `HostResolver`: the capability the enricher depends on
- `DnsResolver`: trust-dns backed implementation (system config when readable)
- `HostRecord`: per-row result of normalization + resolution
- `DnsFailurePolicy`: what a failed lookup does to the row

`HostResolver` implementations report failures as `EnricherError::Resolution`;
`resolve_host` turns them into a `HostRecord` according to the policy.
*/

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use clap::ValueEnum;
use tracing::{debug, warn};
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    system_conf,
};

use crate::errors::{EnricherError, Result};

/// Handling of a row whose hostname does not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DnsFailurePolicy {
    /// Use the hostname itself as the IP and still query the registries
    /// (legacy behavior).
    #[default]
    Degrade,
    /// Leave the row's enrichment fields empty.
    Skip,
}

/// How the `ip` field of a `HostRecord` was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// DNS answered.
    Resolved,
    /// DNS failed; the hostname stands in for the IP.
    Degraded,
    /// DNS failed (or there was no hostname) and the row is not looked up.
    Unresolved,
}

/// A URL cell after normalization and resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub raw_url: String,
    pub hostname: String,
    pub ip: String,
    pub resolution: Resolution,
}

impl HostRecord {
    /// Whether the registries should be queried for this host.
    pub fn is_queryable(&self) -> bool {
        self.resolution != Resolution::Unresolved && !self.ip.is_empty()
    }
}

/// Capability: turn a hostname into an address string.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve(&self, hostname: &str) -> Result<String>;
}

/// Normalize `raw_url`, resolve it and apply `policy` to a failed lookup.
pub async fn resolve_host<R: HostResolver + ?Sized>(
    resolver: &R,
    raw_url: &str,
    policy: DnsFailurePolicy,
) -> HostRecord {
    let hostname = crate::hostname::normalize(raw_url);
    let (ip, resolution) = match resolver.resolve(&hostname).await {
        Ok(ip) => (ip, Resolution::Resolved),
        Err(e) if hostname.is_empty() => {
            debug!("no hostname in {raw_url:?}: {e}");
            (String::new(), Resolution::Unresolved)
        }
        Err(e) => match policy {
            DnsFailurePolicy::Degrade => {
                warn!("{e}; using hostname as address");
                (hostname.clone(), Resolution::Degraded)
            }
            DnsFailurePolicy::Skip => {
                warn!("{e}; row left unresolved");
                (String::new(), Resolution::Unresolved)
            }
        },
    };
    HostRecord {
        raw_url: raw_url.to_string(),
        hostname,
        ip,
        resolution,
    }
}

/// trust-dns backed resolver.
pub struct DnsResolver {
    inner: TokioAsyncResolver,
}

impl DnsResolver {
    /// Build from the system resolver configuration, falling back to the
    /// library defaults when it cannot be read.
    pub fn new(timeout: Option<Duration>) -> Self {
        let (config, mut opts) = system_conf::read_system_conf().unwrap_or_else(|e| {
            debug!("system resolver config unavailable ({e}); using defaults");
            (ResolverConfig::default(), ResolverOpts::default())
        });
        if let Some(t) = timeout {
            opts.timeout = t;
        }
        Self {
            inner: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

#[async_trait]
impl HostResolver for DnsResolver {
    async fn resolve(&self, hostname: &str) -> Result<String> {
        if hostname.is_empty() {
            return Err(EnricherError::resolution(hostname, "empty hostname"));
        }
        if let Ok(ip) = hostname.parse::<IpAddr>() {
            return Ok(ip.to_string());
        }

        debug!("(cmd) host {hostname}");
        let answer = self
            .inner
            .lookup_ip(hostname)
            .await
            .map_err(|e| EnricherError::resolution(hostname, e.to_string()))?;

        let addrs: Vec<IpAddr> = answer.iter().collect();
        addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .map(|a| a.to_string())
            .ok_or_else(|| EnricherError::resolution(hostname, "no address records"))
    }
}
