//! Line boundary probes over a read-only byte view of a file.

/// Returns true if `pos` is the first byte of a line: offset zero, or
/// any offset immediately preceded by a line terminator.
pub fn is_line_start(data: &[u8], pos: usize) -> bool {
    pos == 0 || data[pos - 1] == b'\n'
}

/// Returns the offset just past the next line terminator at or after
/// `pos`, or `data.len()` when no terminator remains. At end of data,
/// returns `pos` unchanged.
pub fn next_line_start(data: &[u8], pos: usize) -> usize {
    match data[pos..].iter().position(|&b| b == b'\n') {
        Some(i) => pos + i + 1,
        None => data.len(),
    }
}
