//! Configuration management for abuseenricher.
//!
//! Values are layered: built-in defaults, then `ABUSEENRICHER_*` environment
//! variables, then command-line flags. The registry endpoints are
//! configurable so mirrors and test servers can stand in for the public
//! RIPE / ARIN services.

use std::time::Duration;

use clap::ValueEnum;
use thiserror::Error;

use crate::cli::Cli;
use crate::resolver::DnsFailurePolicy;

/// Public RIPE database search endpoint used by the RIPE web UI.
pub const RIPE_SEARCH_URL: &str = "https://apps.db.ripe.net/db-web-ui/api/whois/search";

/// Source-application identifier sent with every RIPE search.
pub const RIPE_SOURCE_APP: &str = "investigation007";

/// ARIN REST base for the initial IP lookup.
pub const ARIN_IP_URL: &str = "http://whois.arin.net/rest";

/// ARIN REST base for the PoC follow-up lookups.
pub const ARIN_REST_URL: &str = "https://whois.arin.net/rest";

/// Main configuration structure.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Network client settings
    pub network: NetworkConfig,

    /// Registry endpoints
    pub registry: RegistryConfig,

    /// Column layout of the enriched table
    pub columns: ColumnConfig,

    /// Handling of rows whose hostname does not resolve
    pub dns_failure: DnsFailurePolicy,
}

/// Network-related configuration options
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Per-request HTTP timeout; `None` keeps the client default
    pub http_timeout: Option<Duration>,

    /// DNS timeout; `None` keeps the resolver default
    pub dns_timeout: Option<Duration>,

    /// User-Agent header sent to the registries
    pub user_agent: String,
}

/// Registry endpoint configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub ripe_search_url: String,
    pub ripe_source_app: String,
    pub arin_ip_url: String,
    pub arin_rest_url: String,
}

/// Column names of the table being enriched
#[derive(Debug, Clone)]
pub struct ColumnConfig {
    pub url: String,
    pub ip: String,
    pub organization: String,
    pub abuse_email: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout: None,
            dns_timeout: None,
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            ripe_search_url: RIPE_SEARCH_URL.to_string(),
            ripe_source_app: RIPE_SOURCE_APP.to_string(),
            arin_ip_url: ARIN_IP_URL.to_string(),
            arin_rest_url: ARIN_REST_URL.to_string(),
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            url: "Video URL".to_string(),
            ip: "DNS IP".to_string(),
            organization: "Responsible Org".to_string(),
            abuse_email: "Abuse contact".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("ABUSEENRICHER_HTTP_TIMEOUT_SECS")
            && let Ok(secs) = timeout.parse::<u64>()
        {
            config.network.http_timeout = Some(Duration::from_secs(secs));
        }

        if let Ok(timeout) = std::env::var("ABUSEENRICHER_DNS_TIMEOUT_SECS")
            && let Ok(secs) = timeout.parse::<u64>()
        {
            config.network.dns_timeout = Some(Duration::from_secs(secs));
        }

        if let Ok(agent) = std::env::var("ABUSEENRICHER_USER_AGENT") {
            config.network.user_agent = agent;
        }

        if let Ok(url) = std::env::var("ABUSEENRICHER_RIPE_URL") {
            config.registry.ripe_search_url = url;
        }

        if let Ok(app) = std::env::var("ABUSEENRICHER_RIPE_SOURCE_APP") {
            config.registry.ripe_source_app = app;
        }

        if let Ok(url) = std::env::var("ABUSEENRICHER_ARIN_IP_URL") {
            config.registry.arin_ip_url = url;
        }

        if let Ok(url) = std::env::var("ABUSEENRICHER_ARIN_REST_URL") {
            config.registry.arin_rest_url = url;
        }

        if let Ok(policy) = std::env::var("ABUSEENRICHER_ON_DNS_FAILURE")
            && let Ok(p) = DnsFailurePolicy::from_str(&policy, true)
        {
            config.dns_failure = p;
        }

        config
    }

    /// Merge with CLI arguments, giving CLI precedence
    pub fn merge_with_cli(&mut self, cli: &Cli) {
        if let Some(policy) = cli.on_dns_failure {
            self.dns_failure = policy;
        }
        if let Some(ref name) = cli.url_column {
            self.columns.url = name.clone();
        }
        if let Some(ref name) = cli.ip_column {
            self.columns.ip = name.clone();
        }
        if let Some(ref name) = cli.org_column {
            self.columns.organization = name.clone();
        }
        if let Some(ref name) = cli.email_column {
            self.columns.abuse_email = name.clone();
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, timeout) in [
            ("network.http_timeout", self.network.http_timeout),
            ("network.dns_timeout", self.network.dns_timeout),
        ] {
            if timeout.is_some_and(|t| t.is_zero()) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: "0".to_string(),
                    reason: "Timeout must be greater than 0".to_string(),
                });
            }
        }

        if self.network.user_agent.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "network.user_agent".to_string(),
            });
        }

        for (field, url) in [
            ("registry.ripe_search_url", &self.registry.ripe_search_url),
            ("registry.arin_ip_url", &self.registry.arin_ip_url),
            ("registry.arin_rest_url", &self.registry.arin_rest_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: url.clone(),
                    reason: "Endpoint must be an http:// or https:// URL".to_string(),
                });
            }
        }

        let columns = [
            ("columns.url", &self.columns.url),
            ("columns.ip", &self.columns.ip),
            ("columns.organization", &self.columns.organization),
            ("columns.abuse_email", &self.columns.abuse_email),
        ];
        for (i, (field, name)) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(ConfigError::MissingRequired {
                    field: field.to_string(),
                });
            }
            if columns[..i].iter().any(|(_, other)| other == name) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: name.to_string(),
                    reason: "Column names must be distinct".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Missing required configuration
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.registry.ripe_search_url, RIPE_SEARCH_URL);
        assert_eq!(config.registry.ripe_source_app, "investigation007");
        assert_eq!(config.registry.arin_ip_url, "http://whois.arin.net/rest");
        assert_eq!(config.columns.url, "Video URL");
        assert_eq!(config.columns.ip, "DNS IP");
        assert_eq!(config.dns_failure, DnsFailurePolicy::Degrade);
        assert!(config.network.http_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.network.http_timeout = Some(Duration::from_secs(0));
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.registry.arin_rest_url = "whois.arin.net/rest".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.columns.organization = config.columns.ip.clone();
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "columns.organization")
            }
            other => panic!("unexpected: {other:?}"),
        }

        let mut config = Config::default();
        config.columns.url.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired { .. })
        ));
    }

    #[test]
    fn test_env_loading() {
        unsafe {
            env::set_var("ABUSEENRICHER_HTTP_TIMEOUT_SECS", "15");
            env::set_var("ABUSEENRICHER_ARIN_REST_URL", "http://127.0.0.1:9/rest");
            env::set_var("ABUSEENRICHER_ON_DNS_FAILURE", "SKIP");
        }

        let config = Config::from_env();
        assert_eq!(config.network.http_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.registry.arin_rest_url, "http://127.0.0.1:9/rest");
        assert_eq!(config.dns_failure, DnsFailurePolicy::Skip);

        unsafe {
            env::remove_var("ABUSEENRICHER_HTTP_TIMEOUT_SECS");
            env::remove_var("ABUSEENRICHER_ARIN_REST_URL");
            env::remove_var("ABUSEENRICHER_ON_DNS_FAILURE");
        }
    }

    #[test]
    fn test_cli_takes_precedence() {
        let mut config = Config::default();
        let cli = Cli::parse_from([
            "abuseenricher",
            "--on-dns-failure",
            "skip",
            "--email-column",
            "Abuse",
        ]);
        config.merge_with_cli(&cli);
        assert_eq!(config.dns_failure, DnsFailurePolicy::Skip);
        assert_eq!(config.columns.abuse_email, "Abuse");
        assert_eq!(config.columns.url, "Video URL");
    }
}
