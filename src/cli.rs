use std::path::PathBuf;

use clap::Parser;

use crate::resolver::DnsFailurePolicy;

/// Command-line interface definition.
///
/// Verbosity levels:
/// 0 - silent
/// 1 - errors
/// 2 - warnings + errors
/// 3 - per-row progress (default)
/// 5 - trace/debug (every HTTP call)
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Enrich a table of URLs with resolved IPs, owning organizations and abuse contacts (RIPE, ARIN)"
)]
pub struct Cli {
    /// Workbook to enrich: a CSV file, or a directory holding one CSV per sheet
    #[arg(default_value = "myworkbook.csv")]
    pub workbook: PathBuf,

    /// Sheet name inside the workbook (selects <WORKBOOK>/<SHEET>.csv for directories)
    #[arg(default_value = "INVESTIGATION")]
    pub sheet: String,

    /// Write the enriched table here instead of overwriting the input
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// What to do with a row whose hostname cannot be resolved
    #[arg(long = "on-dns-failure", value_enum)]
    pub on_dns_failure: Option<DnsFailurePolicy>,

    /// Column holding the URL to look up
    #[arg(long = "url-column", value_name = "NAME")]
    pub url_column: Option<String>,

    /// Column receiving the resolved IP address
    #[arg(long = "ip-column", value_name = "NAME")]
    pub ip_column: Option<String>,

    /// Column receiving the responsible organization
    #[arg(long = "org-column", value_name = "NAME")]
    pub org_column: Option<String>,

    /// Column receiving the abuse contact email
    #[arg(long = "email-column", value_name = "NAME")]
    pub email_column: Option<String>,

    /// Verbosity level (0,1,2,3,5)
    #[arg(long, default_value_t = 3)]
    pub verbose: u8,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the JSON schema of the run report and exit
    #[arg(long)]
    pub generate_schema: bool,

    /// Disable colored output in the run report
    #[arg(long)]
    pub no_color: bool,

    /// Enrich and report without writing the table back
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parse CLI arguments from process args.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Are error-level messages enabled?
    pub fn error_enabled(&self) -> bool {
        self.verbose >= 1
    }
}
