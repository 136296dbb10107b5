pub mod boundary;
pub mod planner;

pub use planner::plan_chunks;

/// A contiguous, line-aligned byte range of a file assigned to one scan
/// task.
///
/// Both bounds are line starts by construction (`end` may also be the
/// file size). Chunks planned for one file are gapless, non-overlapping
/// and together cover the whole file, so every line lands in exactly
/// one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// First byte of the chunk, always a line start
    pub start: usize,
    /// One past the last byte, a line start or the file size
    pub end: usize,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_len() {
        let chunk = Chunk { start: 10, end: 25 };
        assert_eq!(chunk.len(), 15);
        assert!(!chunk.is_empty());
        assert!(Chunk { start: 5, end: 5 }.is_empty());
    }
}
