use colored::Colorize;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::results::MatchSpan;

/// Sink for matched lines rendered inline as a match is found.
///
/// A single sink is shared by every chunk scanner of a file, so
/// implementations must serialize concurrent emits; each emitted line
/// must appear as one unbroken visual unit.
pub trait MatchSink: Send + Sync {
    /// Renders one matched line split at the match span: text before
    /// the span, the span itself, text after.
    fn emit(&self, line: &str, span: MatchSpan) -> io::Result<()>;
}

/// Writes highlighted matches to a mutex-guarded writer, marking the
/// matched span in bold red.
pub struct ConsoleHighlighter<W: Write + Send> {
    writer: Mutex<W>,
}

impl ConsoleHighlighter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleHighlighter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the highlighter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> MatchSink for ConsoleHighlighter<W> {
    fn emit(&self, line: &str, span: MatchSpan) -> io::Result<()> {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(
            writer,
            "{}{}{}",
            &line[..span.start],
            span.slice(line).bold().red(),
            &line[span.end..],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_renders_three_segments() {
        colored::control::set_override(false);
        let highlighter = ConsoleHighlighter::new(Vec::new());
        highlighter
            .emit("one foo two", MatchSpan { start: 4, end: 7 })
            .unwrap();
        let rendered = String::from_utf8(highlighter.into_inner()).unwrap();
        assert_eq!(rendered, "one foo two\n");
    }

    #[test]
    fn test_emit_at_line_edges() {
        colored::control::set_override(false);
        let highlighter = ConsoleHighlighter::new(Vec::new());
        highlighter
            .emit("foo", MatchSpan { start: 0, end: 3 })
            .unwrap();
        highlighter
            .emit("ends in foo", MatchSpan { start: 8, end: 11 })
            .unwrap();
        let rendered = String::from_utf8(highlighter.into_inner()).unwrap();
        assert_eq!(rendered, "foo\nends in foo\n");
    }
}
