//! abuseenricher library
//!
//! Enriches a table of URLs with network ownership and abuse-reporting
//! contacts:
//!
//! - Normalize each URL cell to a bare hostname
//! - Resolve the hostname through DNS
//! - Query the RIPE database and ARIN Whois-RWS for the owning organization
//!   and abuse email, preferring RIPE whenever it knows an abuse email
//! - Write IP, organization and abuse email back into the row
//!
//! # Example
//!
//! ```rust,no_run
//! use abuseenricher::config::Config;
//! use abuseenricher::lookup::{ContactLookup, ContactResolver};
//!
//! # async fn run() -> abuseenricher::Result<()> {
//! let resolver = ContactResolver::from_config(&Config::default())?;
//! let found = resolver.resolve_contact("193.0.6.139").await;
//! println!("{} <{}>", found.contact.organization, found.contact.abuse_email);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod enricher;
pub mod errors;
pub mod hostname;
pub mod logging;
pub mod lookup;
pub mod output;
pub mod registry;
pub mod resolver;
pub mod table;

pub use enricher::{EnrichedRow, Enricher, EnrichmentSummary};
pub use errors::{EnricherError, Result};
pub use hostname::normalize;
pub use lookup::{ContactLookup, ContactResolver, merge_contacts};
pub use registry::{ContactRecord, Registry, RegistryResponse, RegistrySource};
pub use resolver::{DnsFailurePolicy, DnsResolver, HostRecord, HostResolver};
pub use table::{Table, TableLocation};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
