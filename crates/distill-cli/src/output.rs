//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use distill_domain::{ExtractionOutcome, StatsSnapshot};
use distill_pipeline::RunReport;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Whether colored output is enabled.
    pub fn color_enabled(&self) -> bool {
        self.color_enabled
    }

    /// Format the final run report.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_report_json(report),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(self.format_report_quiet(report)),
        }
    }

    /// Format the report as JSON.
    fn format_report_json(&self, report: &RunReport) -> Result<String> {
        let outcomes: Vec<serde_json::Value> = report
            .outcomes_in_discovery_order()
            .iter()
            .map(|outcome| {
                let doc = outcome.document();
                match outcome {
                    ExtractionOutcome::Success { record, .. } => serde_json::json!({
                        "document": doc.id,
                        "path": doc.path,
                        "status": "processed",
                        "record": record.as_value(),
                    }),
                    ExtractionOutcome::CacheHit { record, .. } => serde_json::json!({
                        "document": doc.id,
                        "path": doc.path,
                        "status": "cache-hit",
                        "record": record.as_value(),
                    }),
                    ExtractionOutcome::Failure { kind, message, .. } => serde_json::json!({
                        "document": doc.id,
                        "path": doc.path,
                        "status": "failed",
                        "error_kind": kind.as_str(),
                        "error": message,
                    }),
                }
            })
            .collect();

        let stats = &report.stats;
        let value = serde_json::json!({
            "stats": {
                "discovered": stats.discovered,
                "processed": stats.processed,
                "cache_hits": stats.cache_hits,
                "errors": stats.errors,
                "elapsed_secs": stats.elapsed.as_secs_f64(),
                "avg_secs_per_document": stats.avg_secs_per_document(),
            },
            "outcomes": outcomes,
        });

        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Format the report as summary and error tables.
    fn format_report_table(&self, report: &RunReport) -> String {
        let mut output = self.summary_table(&report.stats);
        output.push('\n');
        output.push_str(&self.error_section(&report.stats));
        output
    }

    /// Format the report in quiet mode (one line per document).
    fn format_report_quiet(&self, report: &RunReport) -> String {
        report
            .outcomes_in_discovery_order()
            .iter()
            .map(|outcome| {
                let doc = outcome.document();
                let status = match outcome {
                    ExtractionOutcome::Success { .. } => "processed",
                    ExtractionOutcome::CacheHit { .. } => "cache-hit",
                    ExtractionOutcome::Failure { .. } => "failed",
                };
                format!("{}\t{}", doc.id, status)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the processing summary table.
    pub fn summary_table(&self, stats: &StatsSnapshot) -> String {
        let avg = stats
            .avg_secs_per_document()
            .map(|avg| format!("{:.2}s", avg))
            .unwrap_or_else(|| "n/a".to_string());

        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        builder.push_record(["Files Discovered", &stats.discovered.to_string()]);
        builder.push_record(["Files Processed", &stats.processed.to_string()]);
        builder.push_record(["Cache Hits", &stats.cache_hits.to_string()]);
        builder.push_record(["Errors", &stats.errors.to_string()]);
        builder.push_record(["Total Time", &format!("{:.2}s", stats.elapsed.as_secs_f64())]);
        builder.push_record(["Avg Time/File", &avg]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Build the error section - an explicit "no errors" line when clean.
    pub fn error_section(&self, stats: &StatsSnapshot) -> String {
        if stats.errors == 0 {
            return self.success("No errors.");
        }

        let mut builder = Builder::default();
        builder.push_record(["File", "Kind", "Error"]);

        for record in &stats.error_log {
            builder.push_record([
                record.document_id.as_str(),
                record.kind.as_str(),
                record.message.as_str(),
            ]);
        }

        let overflow = stats.errors.saturating_sub(stats.error_log.len());
        if overflow > 0 {
            builder.push_record(["...", "", &format!("and {} more errors", overflow)]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!("{}\n{}", self.error("Errors encountered:"), table)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "red" => text.red().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distill_domain::{DocumentRef, ErrorKind, ErrorRecord, Fingerprint, StructuredRecord};
    use serde_json::json;
    use std::time::Duration;

    fn report() -> RunReport {
        let doc = DocumentRef::new("a", "a.md", Fingerprint::new("aa"), 0);
        let failing = DocumentRef::new("b", "b.md", Fingerprint::new("bb"), 1);

        RunReport {
            outcomes: vec![
                ExtractionOutcome::Failure {
                    doc: failing,
                    kind: ErrorKind::Validation,
                    message: "missing required field 'title'".to_string(),
                },
                ExtractionOutcome::Success {
                    doc,
                    record: StructuredRecord::new(json!({"title": "T"})),
                },
            ],
            stats: StatsSnapshot {
                discovered: 2,
                processed: 1,
                cache_hits: 0,
                errors: 1,
                error_log: vec![ErrorRecord {
                    document_id: "b".to_string(),
                    kind: ErrorKind::Validation,
                    message: "missing required field 'title'".to_string(),
                    timestamp: 0,
                }],
                elapsed: Duration::from_secs(3),
            },
        }
    }

    fn formatter(format: OutputFormat) -> Formatter {
        Formatter::new(format, false)
    }

    #[test]
    fn test_table_output_contains_counts_and_errors() {
        let output = formatter(OutputFormat::Table)
            .format_report(&report())
            .unwrap();
        assert!(output.contains("Files Discovered"));
        assert!(output.contains("Errors encountered"));
        assert!(output.contains("missing required field"));
    }

    #[test]
    fn test_clean_run_states_no_errors_explicitly() {
        let mut report = report();
        report.stats.errors = 0;
        report.stats.error_log.clear();

        let output = formatter(OutputFormat::Table).error_section(&report.stats);
        assert!(output.contains("No errors."));
    }

    #[test]
    fn test_json_output_reassociates_documents() {
        let output = formatter(OutputFormat::Json)
            .format_report(&report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["stats"]["discovered"], 2);
        // Discovery order, not arrival order
        assert_eq!(value["outcomes"][0]["document"], "a");
        assert_eq!(value["outcomes"][1]["document"], "b");
        assert_eq!(value["outcomes"][1]["error_kind"], "validation");
    }

    #[test]
    fn test_quiet_output_one_line_per_document() {
        let output = formatter(OutputFormat::Quiet)
            .format_report(&report())
            .unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, ["a\tprocessed", "b\tfailed"]);
    }

    #[test]
    fn test_avg_renders_na_when_nothing_resolved() {
        let stats = StatsSnapshot {
            discovered: 1,
            errors: 1,
            ..Default::default()
        };
        let output = formatter(OutputFormat::Table).summary_table(&stats);
        assert!(output.contains("n/a"));
    }

    #[test]
    fn test_error_overflow_row() {
        let mut stats = report().stats;
        stats.errors = 12;
        let output = formatter(OutputFormat::Table).error_section(&stats);
        assert!(output.contains("and 11 more errors"));
    }
}
