//! Distill CLI - batch structured extraction from the command line.
//!
//! Wires the pipeline to a terminal: argument parsing, the class registry in
//! the TOML config, a console observer with per-file progress, and the final
//! summary/error tables.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod observer;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
