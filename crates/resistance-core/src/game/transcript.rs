//! Injectable transcript sink: the game emits one human-readable line per
//! decision point; callers decide where those lines go.

use std::io::Write;

pub trait TranscriptSink {
    fn line(&mut self, message: &str);
}

/// Discards every line.
pub struct NullSink;

impl TranscriptSink for NullSink {
    fn line(&mut self, _message: &str) {}
}

/// Appends each line to any `io::Write` target. Write failures are swallowed;
/// the transcript is observability, not game state.
pub struct WriterSink<W: Write> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> TranscriptSink for WriterSink<W> {
    fn line(&mut self, message: &str) {
        let _ = writeln!(self.inner, "{message}");
    }
}

/// Buffers lines in memory; useful for tests and replay comparison.
#[derive(Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl TranscriptSink for MemorySink {
    fn line(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySink, TranscriptSink, WriterSink};

    #[test]
    fn memory_sink_keeps_lines_in_order() {
        let mut sink = MemorySink::new();
        sink.line("first");
        sink.line("second");
        assert_eq!(sink.lines(), ["first", "second"]);
    }

    #[test]
    fn writer_sink_appends_newlines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.line("a");
        sink.line("b");
        assert_eq!(sink.into_inner(), b"a\nb\n");
    }
}
