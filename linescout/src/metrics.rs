use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Tracks scan throughput and pattern-cache metrics.
///
/// Cheap to clone; clones share the same counters, so one instance can
/// be handed to the matcher and the engine at the same time.
#[derive(Debug, Clone)]
pub struct ScanMetrics {
    chunks_planned: Arc<AtomicU64>,
    bytes_mapped: Arc<AtomicU64>,
    lines_scanned: Arc<AtomicU64>,
    lines_matched: Arc<AtomicU64>,
    cache_hits: Arc<AtomicU64>,
    cache_misses: Arc<AtomicU64>,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self {
            chunks_planned: Arc::new(AtomicU64::new(0)),
            bytes_mapped: Arc::new(AtomicU64::new(0)),
            lines_scanned: Arc::new(AtomicU64::new(0)),
            lines_matched: Arc::new(AtomicU64::new(0)),
            cache_hits: Arc::new(AtomicU64::new(0)),
            cache_misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records the number of chunks planned for a file
    pub fn record_chunks(&self, count: u64) {
        self.chunks_planned.fetch_add(count, Ordering::Relaxed);
    }

    /// Records a memory-mapped file view
    pub fn record_mmap(&self, bytes: u64) {
        self.bytes_mapped.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Records scanned and matched line counts for a completed file
    pub fn record_lines(&self, scanned: u64, matched: u64) {
        self.lines_scanned.fetch_add(scanned, Ordering::Relaxed);
        self.lines_matched.fetch_add(matched, Ordering::Relaxed);
    }

    /// Records a pattern-cache lookup
    pub fn record_cache_operation(&self, hit: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Gets a snapshot of the current counters
    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            chunks_planned: self.chunks_planned.load(Ordering::Relaxed),
            bytes_mapped: self.bytes_mapped.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            lines_matched: self.lines_matched.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats:\n\
             Chunks planned: {}\n\
             Bytes mapped: {}\n\
             Lines scanned/matched: {}/{}\n\
             Pattern cache hits/misses: {}/{}",
            stats.chunks_planned,
            stats.bytes_mapped,
            stats.lines_scanned,
            stats.lines_matched,
            stats.cache_hits,
            stats.cache_misses
        );
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of scan counters
#[derive(Debug, Clone, Copy)]
pub struct ScanStats {
    pub chunks_planned: u64,
    pub bytes_mapped: u64,
    pub lines_scanned: u64,
    pub lines_matched: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}
