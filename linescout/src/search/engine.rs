use memmap2::Mmap;
use rayon::ThreadPoolBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use super::aggregator::run_chunks;
use super::matcher::LineMatcher;
use super::scanner::{ChunkScanner, ScanMode};
use crate::chunk::plan_chunks;
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::ScanMetrics;
use crate::printer::ConsoleHighlighter;
use crate::results::{ChunkResult, SearchSummary};

/// Searches one file: plans line-aligned chunks, scans them in
/// parallel and merges the partial results into a summary.
///
/// When `output` is set, matched lines are collected and written there
/// (newline-terminated, raw text, completion order) instead of being
/// rendered to the console. The elapsed time covers the
/// chunk-processing phase, not the initial open and size probe.
pub fn search_file(
    path: &Path,
    output: Option<&Path>,
    config: &SearchConfig,
) -> SearchResult<SearchSummary> {
    let metrics = ScanMetrics::new();

    // Validate the pattern once, before any chunk is launched.
    let matcher =
        LineMatcher::with_metrics(config.query.clone(), config.pattern.as_deref(), &metrics)?;
    if matcher.is_empty() {
        debug!("No query or pattern given; lines will be scanned but nothing can match");
    }

    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SearchError::file_not_found(path),
        std::io::ErrorKind::PermissionDenied => SearchError::permission_denied(path),
        _ => SearchError::IoError(e),
    })?;
    let file_size = file.metadata().map_err(SearchError::IoError)?.len();

    // A zero-byte file has zero chunks and zero lines, and a zero-length
    // mapping is invalid anyway. Still honor a configured output file.
    if file_size == 0 {
        debug!("{} is empty, nothing to scan", path.display());
        if let Some(output) = output {
            write_matches(output, &[])?;
        }
        return Ok(SearchSummary::default());
    }

    let mmap = unsafe { Mmap::map(&file) }.map_err(SearchError::IoError)?;
    metrics.record_mmap(file_size);

    let pool = ThreadPoolBuilder::new()
        .num_threads(config.thread_count.get())
        .build()
        .map_err(|e| SearchError::config_error(e.to_string()))?;

    let scanner = ChunkScanner::new(matcher, path);
    let highlighter;
    let mode = match output {
        Some(_) => ScanMode::Collect,
        None => {
            highlighter = ConsoleHighlighter::stdout();
            ScanMode::Render(&highlighter)
        }
    };

    let started = Instant::now();
    let chunks = plan_chunks(&mmap, config.thread_count);
    metrics.record_chunks(chunks.len() as u64);
    let results = run_chunks(&pool, &scanner, &mmap, &chunks, mode)?;
    let elapsed = started.elapsed();

    let mut summary = SearchSummary {
        scanned_lines: 0,
        matched_lines: 0,
        elapsed,
    };
    for result in &results {
        summary.scanned_lines += result.scanned_count;
        summary.matched_lines += result.matched_count;
    }
    metrics.record_lines(summary.scanned_lines as u64, summary.matched_lines as u64);

    if let Some(output) = output {
        write_matches(output, &results)?;
    }

    metrics.log_stats();
    info!(
        "Searched {}: {} of {} lines matched in {:?}",
        path.display(),
        summary.matched_lines,
        summary.scanned_lines,
        summary.elapsed
    );
    Ok(summary)
}

/// Writes every collected matched line to `output`, one line per match,
/// in aggregator completion order. The engine is the single writer, so
/// no synchronization is needed here.
fn write_matches(output: &Path, results: &[ChunkResult]) -> SearchResult<()> {
    let mut file = File::create(output).map_err(SearchError::IoError)?;
    for result in results {
        for line in &result.matched_lines {
            writeln!(file, "{line}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;
    use tempfile::tempdir;

    fn config(query: Option<&str>, pattern: Option<&str>, threads: usize) -> SearchConfig {
        SearchConfig {
            query: query.map(str::to_string),
            pattern: pattern.map(str::to_string),
            thread_count: NonZeroUsize::new(threads).unwrap(),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_collects_matches_to_output_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("matches.txt");
        std::fs::write(&input, "foo\nbar\nfoobar\n").unwrap();

        let summary =
            search_file(&input, Some(&output), &config(Some("foo"), None, 1)).unwrap();
        assert_eq!(summary.scanned_lines, 3);
        assert_eq!(summary.matched_lines, 2);

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "foo\nfoobar\n");
    }

    #[test]
    fn test_empty_file_yields_empty_summary() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        let output = dir.path().join("matches.txt");
        std::fs::write(&input, "").unwrap();

        let summary =
            search_file(&input, Some(&output), &config(Some("foo"), None, 4)).unwrap();
        assert_eq!(summary.scanned_lines, 0);
        assert_eq!(summary.matched_lines, 0);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn test_empty_query_matches_no_lines() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, "alpha\nbeta\n").unwrap();

        let summary = search_file(&input, None, &config(Some(""), None, 2)).unwrap();
        assert_eq!(summary.scanned_lines, 2);
        assert_eq!(summary.matched_lines, 0);

        let summary = search_file(&input, None, &config(None, Some(""), 2)).unwrap();
        assert_eq!(summary.matched_lines, 0);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let err = search_file(
            &dir.path().join("nope.txt"),
            None,
            &config(Some("foo"), None, 1),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::FileNotFound(_)));
    }

    #[test]
    fn test_invalid_pattern_fails_before_scanning() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, "some content\n").unwrap();

        let err = search_file(&input, None, &config(None, Some("(unclosed"), 2)).unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern(_)));
    }
}
