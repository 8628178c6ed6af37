//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Distill CLI - extract structured records from document sets.
#[derive(Debug, Parser)]
#[command(name = "distill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line per document)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract structured records from documents into the cache
    Extract(ExtractArgs),

    /// List the configured model classes
    Classes,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// File, glob pattern, or directory to process
    pub source: String,

    /// Model class to extract (must exist in the class registry)
    #[arg(long)]
    pub class: String,

    /// Search directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Maximum concurrent extraction calls
    #[arg(short, long, default_value = "5")]
    pub batch_size: usize,

    /// Reprocess every document and overwrite existing cache entries
    #[arg(long)]
    pub force: bool,

    /// Deadline for a single extraction call (seconds)
    #[arg(long, default_value = "120")]
    pub timeout_secs: u64,

    /// Cache database path (overrides config)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Model name (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Provider endpoint (overrides config)
    #[arg(long)]
    pub endpoint: Option<String>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
