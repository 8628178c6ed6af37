//! Console observer - per-file progress for interactive runs.

use colored::*;
use distill_domain::traits::PipelineObserver;
use distill_domain::{DocumentRef, ExtractionOutcome, StatsSnapshot};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Renders run progress to the terminal
///
/// One ✓/✗ line per document above an indicatif progress bar. The pipeline
/// calls the hooks synchronously, so rendering stays in arrival order.
pub struct ConsoleObserver {
    color_enabled: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleObserver {
    /// Create an observer.
    pub fn new(color_enabled: bool) -> Self {
        Self {
            color_enabled,
            bar: Mutex::new(None),
        }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        match color {
            "green" => text.green().to_string(),
            "red" => text.red().to_string(),
            "blue" => text.blue().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }

    fn println(&self, line: String) {
        let bar = self.bar.lock().unwrap();
        match bar.as_ref() {
            Some(bar) => bar.println(line),
            None => println!("{}", line),
        }
    }
}

impl PipelineObserver for ConsoleObserver {
    fn on_discovered(&self, documents: &[DocumentRef]) {
        println!(
            "{} Found {} documents to process",
            self.paint("✓", "green"),
            documents.len()
        );

        let bar = ProgressBar::new(documents.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message("processing");
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn on_outcome(&self, outcome: &ExtractionOutcome) {
        let line = match outcome {
            ExtractionOutcome::Success { doc, .. } => format!(
                "{} Processed: {}",
                self.paint("✓", "green"),
                self.paint(&doc.id, "cyan")
            ),
            ExtractionOutcome::CacheHit { doc, .. } => format!(
                "{} Loaded cached: {}",
                self.paint("ℹ", "blue"),
                self.paint(&doc.id, "cyan")
            ),
            ExtractionOutcome::Failure { doc, message, .. } => format!(
                "{} Failed: {}: {}",
                self.paint("✗", "red"),
                self.paint(&doc.id, "cyan"),
                message
            ),
        };
        self.println(line);

        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.inc(1);
        }
    }

    fn on_complete(&self, _stats: &StatsSnapshot) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}
