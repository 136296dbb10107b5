use rayon::ThreadPool;
use std::sync::mpsc;
use tracing::debug;

use super::scanner::{ChunkScanner, ScanMode};
use crate::chunk::Chunk;
use crate::errors::SearchResult;
use crate::results::ChunkResult;

/// Runs one scan task per chunk on `pool` and collects the partial
/// results as tasks complete.
///
/// Results arrive in completion order, not chunk order: when matched
/// lines are later written to an output file, line order may differ
/// from file order. Set equality with a sequential scan is the
/// guarantee, not ordering. Every launched task is joined before this
/// returns; the first failure aborts the whole search and any
/// already-completed partial results are dropped.
pub fn run_chunks(
    pool: &ThreadPool,
    scanner: &ChunkScanner,
    data: &[u8],
    chunks: &[Chunk],
    mode: ScanMode<'_>,
) -> SearchResult<Vec<ChunkResult>> {
    let (tx, rx) = mpsc::channel();

    // The scope closure owns the original sender and drops it once all
    // tasks are spawned; each task keeps its own clone.
    pool.scope(move |scope| {
        for &chunk in chunks {
            let tx = tx.clone();
            scope.spawn(move |_| {
                // The receiver outlives the scope, so the send cannot fail.
                let _ = tx.send(scanner.scan_chunk(data, chunk, mode));
            });
        }
    });

    let mut results = Vec::with_capacity(chunks.len());
    for outcome in rx {
        results.push(outcome?);
    }

    debug!("Collected {} chunk results", results.len());
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::plan_chunks;
    use crate::search::matcher::LineMatcher;
    use std::num::NonZeroUsize;

    fn pool(threads: usize) -> ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
    }

    fn collect_scanner(literal: &str) -> ChunkScanner {
        let matcher = LineMatcher::new(Some(literal.to_string()), None).unwrap();
        ChunkScanner::new(matcher, "test.txt")
    }

    #[test]
    fn test_counts_match_sequential_scan() {
        let mut data = Vec::new();
        for i in 0..500 {
            data.extend_from_slice(format!("line {}: needle or not {}\n", i, i % 7).as_bytes());
        }
        let chunks = plan_chunks(&data, NonZeroUsize::new(8).unwrap());
        assert!(chunks.len() > 1);

        let scanner = collect_scanner("needle");
        let results = run_chunks(&pool(8), &scanner, &data, &chunks, ScanMode::Collect).unwrap();

        let scanned: usize = results.iter().map(|r| r.scanned_count).sum();
        let matched: usize = results.iter().map(|r| r.matched_count).sum();
        assert_eq!(scanned, 500);
        assert_eq!(matched, 500);
    }

    #[test]
    fn test_matched_set_equals_sequential_scan() {
        let mut data = Vec::new();
        for i in 0..300 {
            if i % 3 == 0 {
                data.extend_from_slice(format!("ERROR {} happened\n", i).as_bytes());
            } else {
                data.extend_from_slice(format!("info {} fine\n", i).as_bytes());
            }
        }
        let chunks = plan_chunks(&data, NonZeroUsize::new(6).unwrap());
        let scanner = collect_scanner("ERROR");
        let results = run_chunks(&pool(6), &scanner, &data, &chunks, ScanMode::Collect).unwrap();

        let mut parallel: Vec<String> = results
            .into_iter()
            .flat_map(|r| r.matched_lines)
            .collect();
        parallel.sort();

        let text = std::str::from_utf8(&data).unwrap();
        let mut sequential: Vec<String> = text
            .lines()
            .filter(|l| l.contains("ERROR"))
            .map(str::to_string)
            .collect();
        sequential.sort();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_chunk_failure_aborts_the_run() {
        let mut data = Vec::new();
        for _ in 0..100 {
            data.extend_from_slice(b"a perfectly fine line\n");
        }
        data.extend_from_slice(b"broken \xff byte\n");
        for _ in 0..100 {
            data.extend_from_slice(b"more fine lines\n");
        }

        let chunks = plan_chunks(&data, NonZeroUsize::new(4).unwrap());
        let scanner = collect_scanner("fine");
        let outcome = run_chunks(&pool(4), &scanner, &data, &chunks, ScanMode::Collect);
        assert!(outcome.is_err());
    }

    #[test]
    fn test_no_chunks_yields_no_results() {
        let scanner = collect_scanner("x");
        let results = run_chunks(&pool(2), &scanner, b"", &[], ScanMode::Collect).unwrap();
        assert!(results.is_empty());
    }
}
