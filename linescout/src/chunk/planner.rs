use std::num::NonZeroUsize;
use tracing::debug;

use super::boundary::{is_line_start, next_line_start};
use super::Chunk;

/// Divides a file view into contiguous, line-aligned chunks, one per
/// unit of parallelism.
///
/// Each chunk targets `len / parallelism` bytes. A proposed chunk end is
/// walked backward to the nearest line start so no line is ever split
/// across chunks. When a single line is longer than the target window,
/// the end is instead walked forward past that line; the chunk exceeds
/// the target size but planning always makes forward progress. An empty
/// input yields zero chunks.
pub fn plan_chunks(data: &[u8], parallelism: NonZeroUsize) -> Vec<Chunk> {
    let file_size = data.len();
    let target_size = file_size / parallelism.get();
    let mut chunks = Vec::with_capacity(parallelism.get());

    let mut chunk_start = 0;
    while chunk_start < file_size {
        let mut chunk_end = file_size.min(chunk_start + target_size);
        while chunk_end > chunk_start && !is_line_start(data, chunk_end) {
            chunk_end -= 1;
        }
        // No line boundary inside the target window: take the whole
        // oversized line instead.
        if chunk_end == chunk_start {
            chunk_end = next_line_start(data, chunk_end);
        }
        chunks.push(Chunk {
            start: chunk_start,
            end: chunk_end,
        });
        chunk_start = chunk_end;
    }

    debug!(
        "Planned {} chunks over {} bytes (target {} bytes each)",
        chunks.len(),
        file_size,
        target_size
    );
    chunks
}
