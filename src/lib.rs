//! promptdupe - Near-duplicate prompt finder
//!
//! Finds near-identical entries in a saved-prompt library. Entries are
//! compared pairwise by title and content with a metric chosen by string
//! length, pruned by content-length buckets, and bounded by an item limit
//! and a wall-clock budget.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod entry;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod signal;
pub mod similarity;

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{Cli, Commands, CompareArgs, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateGroup, DuplicateScanner, ScanError, ScanOptions, ScanSummary};
use crate::entry::{EntryRepository, FileRepository};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::Progress;
use crate::similarity::{char_len, smart_similarity, Metric, SimilarityScore, StandardMetrics};

/// Question asked before scanning a collection above the item limit.
pub const SIZE_LIMIT_PROMPT: &str = "Too many prompts to compare safely; continue anyway? [y/N] ";

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded, the scan fails, or the
/// output cannot be written. [`ExitCode::from_error`] maps it to an exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    match &cli.command {
        Commands::Scan(args) => run_scan(args, &cli),
        Commands::Compare(args) => run_compare(args),
    }
}

fn run_scan(args: &ScanArgs, cli: &Cli) -> Result<ExitCode> {
    let mut config = Config::load(args.config.as_deref());
    config.merge_scan_args(args);
    log::debug!("Effective configuration: {:?}", config);

    let entries = FileRepository::new(&args.path)
        .get_all()
        .with_context(|| format!("Failed to load prompts from {}", args.path.display()))?;

    let cancel = signal::install_handler()?;
    let show_progress = !cli.quiet && !args.no_progress && io::stderr().is_terminal();
    let options = config
        .to_scan_options()
        .with_shutdown_flag(cancel.flag())
        .with_progress_callback(Arc::new(Progress::with_accessible(
            !show_progress,
            cli.no_color,
        )));

    let (groups, summary) = scan_with_confirmation(&entries, options, args)?;

    let exit_code = if groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    };

    let color = !cli.no_color && io::stdout().is_terminal();
    write_report(args.output, &groups, &summary, exit_code, color)?;
    Ok(exit_code)
}

/// Scan, asking once for confirmation if the collection is over the limit.
fn scan_with_confirmation(
    entries: &[entry::Entry],
    options: ScanOptions,
    args: &ScanArgs,
) -> Result<(Vec<DuplicateGroup>, ScanSummary)> {
    match DuplicateScanner::new(options.clone()).scan_with_summary(entries) {
        Ok(result) => Ok(result),
        Err(err @ ScanError::SizeLimitExceeded { .. }) => {
            if !confirm_large_scan(args.yes, &err)? {
                return Err(anyhow::Error::new(err).context("Duplicate scan refused"));
            }
            log::info!("Continuing past the size limit at user request");
            DuplicateScanner::new(options.with_allow_large_datasets(true))
                .scan_with_summary(entries)
                .context("Duplicate scan failed")
        }
        Err(err) => Err(anyhow::Error::new(err).context("Duplicate scan failed")),
    }
}

/// Ask whether to scan past the size limit. Non-interactive sessions decline.
fn confirm_large_scan(assume_yes: bool, err: &ScanError) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
        return Ok(false);
    }

    let mut stderr = io::stderr();
    writeln!(stderr, "{}", err)?;
    write!(stderr, "{}", SIZE_LIMIT_PROMPT)?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

/// `y` or `yes`, case-insensitive.
fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn write_report(
    format: OutputFormat,
    groups: &[DuplicateGroup],
    summary: &ScanSummary,
    exit_code: ExitCode,
    color: bool,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => TextOutput::new(groups, summary)
            .with_color(color)
            .write_to(&mut out)
            .context("Failed to write results")?,
        OutputFormat::Json => JsonOutput::new(groups, summary, exit_code)
            .write_to(&mut out, true)
            .context("Failed to write JSON results")?,
        OutputFormat::Csv => CsvOutput::new(groups)
            .write_to(&mut out)
            .context("Failed to write CSV results")?,
    }
    Ok(())
}

/// Result of comparing two strings from the command line.
#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    /// Metric that produced the score
    pub metric: Metric,
    /// The score, or below threshold
    pub score: SimilarityScore,
    /// Threshold applied
    pub threshold: f64,
    /// Whether the score strictly exceeds the threshold
    pub similar: bool,
}

/// Compare two strings with a fixed metric, or automatically when `metric` is `None`.
///
/// # Example
///
/// ```
/// use promptdupe::compare;
/// use promptdupe::similarity::Metric;
///
/// let report = compare("Hello world", "Hello world!", 0.9, None);
/// assert_eq!(report.metric, Metric::JaroWinkler);
/// assert!(report.similar);
/// ```
#[must_use]
pub fn compare(a: &str, b: &str, threshold: f64, metric: Option<Metric>) -> CompareReport {
    let (metric, score) = match metric {
        Some(metric) => (metric, metric.score(&StandardMetrics, a, b, threshold)),
        None => (
            Metric::for_length(char_len(a).max(char_len(b))),
            smart_similarity(a, b, threshold),
        ),
    };

    CompareReport {
        metric,
        score,
        threshold,
        similar: score.exceeds(threshold),
    }
}

fn run_compare(args: &CompareArgs) -> Result<ExitCode> {
    let report = compare(&args.a, &args.b, args.threshold, args.metric.metric());
    log::debug!("Compare report: {:?}", report);

    println!("{} ({})", report.score, report.metric);
    Ok(if report.similar {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    })
}
