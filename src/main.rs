use std::time::Instant;

use anyhow::{Context, Result};

use abuseenricher::cli::Cli;
use abuseenricher::config::Config;
use abuseenricher::enricher::Enricher;
use abuseenricher::errors::EnricherError;
use abuseenricher::logging;
use abuseenricher::lookup::ContactResolver;
use abuseenricher::output::{ReportFormatter, RunReport};
use abuseenricher::resolver::DnsResolver;
use abuseenricher::table::{Table, TableLocation};

// Rows are processed one after another; a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    if cli.generate_schema {
        println!("{}", RunReport::generate_json_schema()?);
        return Ok(());
    }

    logging::init_logging(cli.verbose);
    let start_time = Instant::now();

    let mut config = Config::from_env();
    config.merge_with_cli(&cli);
    config.validate().context("configuration error")?;

    let location = TableLocation::new(&cli.workbook, &cli.sheet);
    let mut table =
        Table::load(&location).map_err(|e| categorized(e, format!("cannot read table {location}")))?;
    tracing::info!("loaded {} rows from {location}", table.len());

    let contacts = ContactResolver::from_config(&config)
        .map_err(|e| categorized(e, "cannot set up registry clients".to_string()))?;
    let resolver = DnsResolver::new(config.network.dns_timeout);
    let enricher = Enricher::new(resolver, contacts, config.columns.clone(), config.dns_failure);
    let summary = enricher
        .enrich_table(&mut table, &location.to_string())
        .await
        .map_err(|e| categorized(e, format!("cannot enrich {location}")))?;

    let output = if cli.dry_run {
        None
    } else {
        let path = cli.output.clone().unwrap_or_else(|| location.csv_path());
        table
            .write(&path)
            .map_err(|e| categorized(e, format!("cannot write {}", path.display())))?;
        Some(path.display().to_string())
    };

    let report = RunReport::new(
        location.to_string(),
        output,
        u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX),
        summary,
    );
    if cli.json {
        println!("{}", report.to_json()?);
    } else if cli.error_enabled() {
        let formatter = if cli.no_color {
            ReportFormatter::without_colors()
        } else {
            ReportFormatter::new()
        };
        print!("{}", formatter.format(&report));
    }

    Ok(())
}

/// Wrap a fatal library error, naming the failed step and its category.
fn categorized(err: EnricherError, step: String) -> anyhow::Error {
    let category = err.category();
    anyhow::Error::new(err).context(format!("{step} ({category} error)"))
}
