//! Command-line interface definitions for promptdupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, color, error format) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # Scan an exported prompt library
//! promptdupe scan prompts.json
//!
//! # JSON output for scripting, larger limit
//! promptdupe scan prompts.csv --output json --max-items 5000
//!
//! # Score two strings with the automatic metric
//! promptdupe compare "Hello world" "Hello wrld"
//!
//! # Verbose mode for debugging
//! promptdupe -v scan prompts.json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::similarity::Metric;

/// Near-duplicate prompt finder.
///
/// promptdupe compares every saved prompt against the others by title and
/// content, and groups near-identical ones under the earliest original.
#[derive(Debug, Parser)]
#[command(name = "promptdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for promptdupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a prompt export for near-duplicates
    Scan(ScanArgs),
    /// Score the similarity of two strings
    Compare(CompareArgs),
}

/// Arguments for the scan subcommand.
///
/// Options left unset fall back to the configuration file and environment.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Prompt export to scan (.json or .csv)
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Largest number of prompts scanned without confirmation
    #[arg(long, value_name = "N")]
    pub max_items: Option<usize>,

    /// Scan collections above --max-items without asking
    #[arg(long)]
    pub allow_large: bool,

    /// Wall-clock budget for the scan in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Minimum time between cooperative yields in milliseconds
    #[arg(long, value_name = "MS")]
    pub yield_interval_ms: Option<u64>,

    /// Title similarity cutoff (0.0 - 1.0, strictly exceeded)
    #[arg(long, value_name = "T", value_parser = parse_threshold)]
    pub title_threshold: Option<f64>,

    /// Content similarity cutoff (0.0 - 1.0, strictly exceeded)
    #[arg(long, value_name = "T", value_parser = parse_threshold)]
    pub content_threshold: Option<f64>,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Continue past the size limit without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the compare subcommand.
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// First string
    #[arg(value_name = "A")]
    pub a: String,

    /// Second string
    #[arg(value_name = "B")]
    pub b: String,

    /// Similarity threshold (0.0 - 1.0)
    #[arg(short, long, value_name = "T", default_value = "0.9", value_parser = parse_threshold)]
    pub threshold: f64,

    /// Metric to apply
    #[arg(short, long, value_enum, default_value = "auto")]
    pub metric: MetricArg,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Metric choice for the compare subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    /// Pick by length, with the length-ratio fast reject
    Auto,
    /// Threshold-bounded Levenshtein similarity
    Levenshtein,
    /// Jaro-Winkler
    JaroWinkler,
    /// Trigram cosine
    Cosine,
    /// Chunk-hash Jaccard
    HashJaccard,
}

impl MetricArg {
    /// The fixed metric, or `None` for automatic selection.
    #[must_use]
    pub fn metric(self) -> Option<Metric> {
        match self {
            MetricArg::Auto => None,
            MetricArg::Levenshtein => Some(Metric::Levenshtein),
            MetricArg::JaroWinkler => Some(Metric::JaroWinkler),
            MetricArg::Cosine => Some(Metric::Cosine),
            MetricArg::HashJaccard => Some(Metric::HashJaccard),
        }
    }
}

/// Parse a similarity threshold in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use promptdupe::cli::parse_threshold;
///
/// assert_eq!(parse_threshold("0.85").unwrap(), 0.85);
/// assert!(parse_threshold("1.5").is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the string is not a number or lies outside `[0, 1]`.
pub fn parse_threshold(s: &str) -> Result<f64, String> {
    let s = s.trim();
    let value: f64 = s
        .parse()
        .map_err(|_| format!("Invalid threshold: '{s}'"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!("Threshold must be between 0.0 and 1.0, got {value}"));
    }
    Ok(value)
}
