use std::io::{self, Write};

use crate::event::TraceEvent;
use crate::format::format_event;

/// Destination for formatted trace output.
pub trait TraceSink: Send {
    /// Write `line` followed by a line break.
    fn write(&mut self, line: &str) -> io::Result<()>;

    /// Format `event` and write it as one line.
    fn handle(&mut self, event: &TraceEvent) -> io::Result<()> {
        self.write(&format_event(event))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Box<T> {
    fn write(&mut self, line: &str) -> io::Result<()> {
        (**self).write(line)
    }

    fn handle(&mut self, event: &TraceEvent) -> io::Result<()> {
        (**self).handle(event)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Sink writing unbuffered lines to the console error stream.
///
/// Generic over the writer so output can be captured; [`ConsoleSink::stderr`]
/// is the normal constructor.
#[derive(Debug)]
pub struct ConsoleSink<W = io::Stderr> {
    writer: W,
}

impl ConsoleSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl Default for ConsoleSink<io::Stderr> {
    fn default() -> Self {
        Self::stderr()
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Write `text` without a trailing line break.
    pub fn write_fragment(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> TraceSink for ConsoleSink<W> {
    fn write(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TraceEventKind;

    fn captured(sink: ConsoleSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn handle_writes_one_formatted_line() {
        let mut sink = ConsoleSink::with_writer(Vec::new());
        sink.handle(&TraceEvent::new(TraceEventKind::Warning, "low disk"))
            .unwrap();
        sink.handle(&TraceEvent::new(TraceEventKind::Start, "Copy").with_depth(1))
            .unwrap();
        assert_eq!(captured(sink), "[Warning] low disk\n-> Copy\n");
    }

    #[test]
    fn empty_message_still_writes_prefix_and_newline() {
        let mut sink = ConsoleSink::with_writer(Vec::new());
        sink.handle(&TraceEvent::from_optional(TraceEventKind::Error, None))
            .unwrap();
        sink.handle(&TraceEvent::new(TraceEventKind::Information, ""))
            .unwrap();
        assert_eq!(captured(sink), "[Error] \n\n");
    }

    #[test]
    fn fragments_are_not_terminated() {
        let mut sink = ConsoleSink::with_writer(Vec::new());
        sink.write_fragment("Working...").unwrap();
        sink.write(" done").unwrap();
        assert_eq!(captured(sink), "Working... done\n");
    }
}
