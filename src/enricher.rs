//! Row enrichment.
//!
//! Walks a table strictly in order. For every row the URL cell is
//! normalized, resolved and looked up, and the IP / organization / abuse
//! email cells are overwritten. No row-level failure stops the pass: a row
//! that cannot be resolved or looked up is written with empty fields.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ColumnConfig;
use crate::errors::Result;
use crate::lookup::ContactLookup;
use crate::registry::{ContactRecord, Registry};
use crate::resolver::{DnsFailurePolicy, HostRecord, HostResolver, Resolution, resolve_host};
use crate::table::Table;

/// Outcome for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRow {
    pub host: HostRecord,
    pub contact: ContactRecord,
    /// Registry whose pair was selected; `None` when nothing was queried.
    pub source: Option<Registry>,
}

/// Counters for a finished pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, schemars::JsonSchema)]
pub struct EnrichmentSummary {
    pub rows: usize,
    pub resolved: usize,
    pub degraded: usize,
    pub unresolved: usize,
    pub with_organization: usize,
    pub with_abuse_email: usize,
    pub from_ripe: usize,
    pub from_arin: usize,
    /// 1-based numbers of rows that ended without an abuse email.
    pub rows_without_email: Vec<usize>,
}

impl EnrichmentSummary {
    fn record(&mut self, number: usize, row: &EnrichedRow) {
        self.rows += 1;
        match row.host.resolution {
            Resolution::Resolved => self.resolved += 1,
            Resolution::Degraded => self.degraded += 1,
            Resolution::Unresolved => self.unresolved += 1,
        }
        if !row.contact.organization.is_empty() {
            self.with_organization += 1;
        }
        if row.contact.has_email() {
            self.with_abuse_email += 1;
        } else {
            self.rows_without_email.push(number);
        }
        match row.source {
            Some(Registry::Ripe) => self.from_ripe += 1,
            Some(Registry::Arin) => self.from_arin += 1,
            None => {}
        }
    }
}

pub struct Enricher<H, C> {
    resolver: H,
    contacts: C,
    columns: ColumnConfig,
    policy: DnsFailurePolicy,
}

impl<H: HostResolver, C: ContactLookup> Enricher<H, C> {
    pub fn new(resolver: H, contacts: C, columns: ColumnConfig, policy: DnsFailurePolicy) -> Self {
        Self {
            resolver,
            contacts,
            columns,
            policy,
        }
    }

    /// Resolve one raw URL to its host record and contact pair.
    pub async fn enrich_url(&self, raw_url: &str) -> EnrichedRow {
        let host = resolve_host(&self.resolver, raw_url, self.policy).await;
        if !host.is_queryable() {
            return EnrichedRow {
                host,
                contact: ContactRecord::default(),
                source: None,
            };
        }

        let resolved = self.contacts.resolve_contact(&host.ip).await;
        EnrichedRow {
            host,
            contact: resolved.contact,
            source: Some(resolved.source),
        }
    }

    /// Enrich every row of `table` in place.
    ///
    /// The IP column is dropped and re-created as the last column; the
    /// organization and abuse-email columns are overwritten, or appended
    /// after it when missing. Fails only when the URL column is absent.
    pub async fn enrich_table(&self, table: &mut Table, location: &str) -> Result<EnrichmentSummary> {
        table.require_column(&self.columns.url, location)?;
        table.reset_column_last(&self.columns.ip);
        table.ensure_column(&self.columns.abuse_email);
        table.ensure_column(&self.columns.organization);

        let url_col = table.require_column(&self.columns.url, location)?;
        let ip_col = table.require_column(&self.columns.ip, location)?;
        let email_col = table.require_column(&self.columns.abuse_email, location)?;
        let org_col = table.require_column(&self.columns.organization, location)?;

        let total = table.len();
        let mut summary = EnrichmentSummary::default();
        for row in table.rows_mut() {
            let number = row.number();
            let raw_url = row.get(url_col).to_string();
            info!("row {number}/{total}: {raw_url}");

            let enriched = self.enrich_url(&raw_url).await;
            if enriched.host.resolution == Resolution::Unresolved {
                warn!("row {number}: no address for {raw_url:?}, leaving it empty");
            }

            row.set(ip_col, enriched.host.ip.as_str());
            row.set(org_col, enriched.contact.organization.as_str());
            row.set(email_col, enriched.contact.abuse_email.as_str());
            summary.record(number, &enriched);
        }

        info!(
            "enriched {} rows: {} with abuse email, {} degraded, {} unresolved",
            summary.rows, summary.with_abuse_email, summary.degraded, summary.unresolved
        );
        Ok(summary)
    }
}
