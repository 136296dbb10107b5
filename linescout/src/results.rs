use std::time::Duration;

/// The half-open byte range of a match within a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    /// Byte offset of the first matched byte within the line
    pub start: usize,
    /// Byte offset one past the last matched byte
    pub end: usize,
}

impl MatchSpan {
    /// The matched text itself.
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }
}

/// Partial result produced by scanning a single chunk.
///
/// Owned by the scan task until it completes, then handed to the
/// aggregator. Line order is preserved within a chunk; the aggregator
/// makes no ordering promise across chunks.
#[derive(Debug, Default)]
pub struct ChunkResult {
    /// Raw matched lines, populated only when matches are being
    /// collected for an output file
    pub matched_lines: Vec<String>,
    /// Number of lines that matched
    pub matched_count: usize,
    /// Number of lines examined, matched or not
    pub scanned_count: usize,
}

/// Outcome of searching one file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchSummary {
    /// Total lines examined across all chunks
    pub scanned_lines: usize,
    /// Total lines that matched
    pub matched_lines: usize,
    /// Wall-clock time of the chunk-processing phase
    pub elapsed: Duration,
}
