use std::path::PathBuf;
use tracing::trace;

use super::matcher::LineMatcher;
use crate::chunk::boundary::{is_line_start, next_line_start};
use crate::chunk::Chunk;
use crate::errors::{SearchError, SearchResult};
use crate::printer::MatchSink;
use crate::results::ChunkResult;

/// How a scanner disposes of matched lines.
#[derive(Clone, Copy)]
pub enum ScanMode<'a> {
    /// Render each match through the shared sink as it is found
    Render(&'a dyn MatchSink),
    /// Buffer raw matched lines for the aggregator
    Collect,
}

/// Scans the complete lines of one chunk against a shared matcher.
///
/// One scanner is shared read-only by every chunk task of a file; the
/// per-chunk state lives entirely in the returned [`ChunkResult`].
#[derive(Debug, Clone)]
pub struct ChunkScanner {
    matcher: LineMatcher,
    path: PathBuf,
}

impl ChunkScanner {
    pub fn new(matcher: LineMatcher, path: impl Into<PathBuf>) -> Self {
        Self {
            matcher,
            path: path.into(),
        }
    }

    /// Scans every line in `[chunk.start, chunk.end)` of the shared
    /// file view.
    ///
    /// Chunk bounds are line starts by construction, so consumption
    /// stops exactly at `chunk.end` and no line is read by two chunks.
    /// A line that fails UTF-8 decoding aborts this chunk with an
    /// encoding error carrying the byte offset of the first bad byte;
    /// sibling chunks are unaffected.
    pub fn scan_chunk(
        &self,
        data: &[u8],
        chunk: Chunk,
        mode: ScanMode<'_>,
    ) -> SearchResult<ChunkResult> {
        trace!(
            "Scanning bytes {}..{} of {}",
            chunk.start,
            chunk.end,
            self.path.display()
        );
        debug_assert!(
            chunk.end == data.len() || is_line_start(data, chunk.end),
            "chunk end {} must be a line start or the end of data",
            chunk.end
        );

        let mut result = ChunkResult::default();
        let mut consumed = chunk.start;
        while consumed < chunk.end {
            let line_start = consumed;
            consumed = next_line_start(data, consumed);

            let line = std::str::from_utf8(&data[line_start..consumed]).map_err(|e| {
                SearchError::encoding_error(
                    &self.path,
                    (line_start + e.valid_up_to()) as u64,
                    e,
                )
            })?;
            let line = line.strip_suffix('\n').unwrap_or(line);

            result.scanned_count += 1;
            if let Some(span) = self.matcher.find(line) {
                result.matched_count += 1;
                match mode {
                    ScanMode::Render(sink) => sink.emit(line, span)?,
                    ScanMode::Collect => result.matched_lines.push(line.to_string()),
                }
            }
        }

        Ok(result)
    }
}
