use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use linescout::{search_file, SearchConfig, SearchSummary};
use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Parallel, chunk-based line search over large files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File(s) to search, comma-separated
    file: String,

    /// Literal substring to search for
    #[arg(short, long)]
    query: Option<String>,

    /// Regular expression to search for
    #[arg(short = 'r', long = "regex")]
    pattern: Option<String>,

    /// Write matched lines to this file instead of the console
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of threads to use (default: CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = SearchConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    let cli_config = SearchConfig {
        files: cli
            .file
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| PathBuf::from(s.trim()))
            .collect(),
        query: cli.query,
        pattern: cli.pattern,
        output: cli.output,
        thread_count: cli
            .threads
            .or_else(|| NonZeroUsize::new(num_cpus::get()))
            .unwrap_or(NonZeroUsize::MIN),
        log_level: cli.log_level,
    };
    let config = file_config.merge_with_cli(cli_config);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    if config.files.is_empty() {
        bail!("no files to search");
    }
    tracing::debug!(
        "Searching {} file(s) with {} threads",
        config.files.len(),
        config.thread_count
    );

    // Multi-file fan-out: each file gets its own output destination,
    // derived from the base name with an index prefix.
    let multi = config.files.len() > 1;
    config
        .files
        .par_iter()
        .enumerate()
        .try_for_each(|(index, path)| -> Result<()> {
            let output = config.output.as_ref().map(|base| {
                if multi {
                    indexed_output(index, base)
                } else {
                    base.clone()
                }
            });
            let summary = search_file(path, output.as_deref(), &config)
                .with_context(|| format!("search failed for {}", path.display()))?;
            report(path, &summary);
            Ok(())
        })
}

/// Derives the per-file output path for multi-file runs: `matches.txt`
/// becomes `0_matches.txt`, `1_matches.txt` and so on.
fn indexed_output(index: usize, base: &Path) -> PathBuf {
    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.with_file_name(format!("{index}_{name}"))
}

fn report(path: &Path, summary: &SearchSummary) {
    // Truncate to milliseconds so humantime stays readable
    let elapsed = Duration::from_millis(summary.elapsed.as_millis() as u64);
    println!(
        "{}: scanned {} lines, {} matched, took {}",
        path.display().to_string().bold(),
        summary.scanned_lines,
        summary.matched_lines,
        humantime::format_duration(elapsed),
    );
}
