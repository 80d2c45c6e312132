//! End-of-run report: styled text for terminals, JSON for pipelines.

use std::fmt::Write;
use std::io::IsTerminal;

use anstyle::{AnsiColor, Color, Style};
use schemars::JsonSchema;
use serde::Serialize;

use crate::enricher::EnrichmentSummary;

/// What a run did, as printed after the table is written.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RunReport {
    pub tool: String,
    pub version: String,
    /// Workbook and sheet that were read.
    pub input: String,
    /// File the enriched table was written to; `None` on a dry run.
    pub output: Option<String>,
    pub elapsed_ms: u64,
    pub summary: EnrichmentSummary,
}

impl RunReport {
    pub fn new(
        input: impl Into<String>,
        output: Option<String>,
        elapsed_ms: u64,
        summary: EnrichmentSummary,
    ) -> Self {
        Self {
            tool: crate::NAME.to_string(),
            version: crate::VERSION.to_string(),
            input: input.into(),
            output,
            elapsed_ms,
            summary,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn generate_json_schema() -> serde_json::Result<String> {
        let schema = schemars::schema_for!(RunReport);
        serde_json::to_string_pretty(&schema)
    }
}

/// Style definitions for the text report
struct Styles {
    header: Style,
    success: Style,
    warning: Style,
    muted: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            header: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue))),
            success: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
            warning: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            muted: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))),
        }
    }
}

/// Text renderer for `RunReport`.
pub struct ReportFormatter {
    styles: Styles,
    use_colors: bool,
}

impl ReportFormatter {
    /// Colors follow the terminal and `NO_COLOR`.
    pub fn new() -> Self {
        Self {
            styles: Styles::default(),
            use_colors: std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
        }
    }

    pub fn without_colors() -> Self {
        Self {
            styles: Styles::default(),
            use_colors: false,
        }
    }

    fn styled(&self, text: &str, style: &Style) -> String {
        if self.use_colors {
            format!("{}{}{}", style.render(), text, style.render_reset())
        } else {
            text.to_string()
        }
    }

    pub fn format(&self, report: &RunReport) -> String {
        let s = &report.summary;
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.styled("Abuse contact enrichment", &self.styles.header));
        let _ = writeln!(out, "  Input:   {}", report.input);
        match report.output {
            Some(ref path) => {
                let _ = writeln!(out, "  Output:  {path}");
            }
            None => {
                let _ = writeln!(out, "  Output:  {}", self.styled("(dry run, not written)", &self.styles.muted));
            }
        }
        let _ = writeln!(out, "  Rows:    {} ({} ms)", s.rows, report.elapsed_ms);
        let _ = writeln!(
            out,
            "  DNS:     {} resolved, {} degraded, {} unresolved",
            s.resolved, s.degraded, s.unresolved
        );
        let _ = writeln!(
            out,
            "  Sources: {} from RIPE, {} from ARIN",
            s.from_ripe, s.from_arin
        );
        let _ = writeln!(out, "  Orgs:    {}", s.with_organization);

        let emails = format!("{}/{}", s.with_abuse_email, s.rows);
        let style = if s.rows_without_email.is_empty() {
            &self.styles.success
        } else {
            &self.styles.warning
        };
        let _ = writeln!(out, "  Emails:  {}", self.styled(&emails, style));

        if !s.rows_without_email.is_empty() {
            let list: Vec<String> = s.rows_without_email.iter().map(|n| n.to_string()).collect();
            let _ = writeln!(
                out,
                "  {}",
                self.styled(&format!("No abuse contact for rows: {}", list.join(", ")), &self.styles.muted)
            );
        }
        out
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport::new(
            "cases.csv [INVESTIGATION]",
            Some("cases.csv".to_string()),
            42,
            EnrichmentSummary {
                rows: 3,
                resolved: 2,
                degraded: 1,
                with_organization: 2,
                with_abuse_email: 2,
                from_ripe: 1,
                from_arin: 2,
                rows_without_email: vec![3],
                ..Default::default()
            },
        )
    }

    #[test]
    fn plain_text_report() {
        let text = ReportFormatter::without_colors().format(&report());
        assert!(text.contains("Input:   cases.csv [INVESTIGATION]"));
        assert!(text.contains("2 resolved, 1 degraded, 0 unresolved"));
        assert!(text.contains("Emails:  2/3"));
        assert!(text.contains("No abuse contact for rows: 3"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn dry_run_has_no_output_path() {
        let mut r = report();
        r.output = None;
        let text = ReportFormatter::without_colors().format(&r);
        assert!(text.contains("dry run"));
    }

    #[test]
    fn json_report_and_schema() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(json["tool"], "abuseenricher");
        assert_eq!(json["summary"]["with_abuse_email"], 2);
        assert_eq!(json["summary"]["rows_without_email"], serde_json::json!([3]));

        let schema = RunReport::generate_json_schema().unwrap();
        assert!(schema.contains("RunReport"));
        assert!(schema.contains("rows_without_email"));
    }
}
