use std::fmt;

use crate::event::{TraceEvent, TraceEventKind};
use crate::sink::TraceSink;

/// Owns a list of sinks and the logical operation stack.
///
/// Events are delivered to every sink in registration order. A failing sink
/// does not stop delivery to the others and its error is dropped.
#[derive(Default)]
pub struct TraceDispatcher {
    sinks: Vec<Box<dyn TraceSink>>,
    operations: Vec<String>,
}

impl TraceDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: impl TraceSink + 'static) -> Self {
        self.add_sink(sink);
        self
    }

    pub fn add_sink(&mut self, sink: impl TraceSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Number of operations currently started and not yet stopped.
    pub fn depth(&self) -> usize {
        self.operations.len()
    }

    pub fn dispatch(&mut self, event: &TraceEvent) {
        for sink in &mut self.sinks {
            let _ = sink.handle(event);
        }
    }

    /// Emit an event of `kind` at the current operation depth.
    pub fn emit(&mut self, kind: TraceEventKind, message: impl Into<String>) {
        let event = TraceEvent::new(kind, message).with_depth(self.depth());
        self.dispatch(&event);
    }

    /// Emit a message built from format arguments.
    pub fn emit_fmt(&mut self, kind: TraceEventKind, args: fmt::Arguments<'_>) {
        self.emit(kind, args.to_string());
    }

    pub fn information(&mut self, message: impl Into<String>) {
        self.emit(TraceEventKind::Information, message);
    }

    pub fn verbose(&mut self, message: impl Into<String>) {
        self.emit(TraceEventKind::Verbose, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.emit(TraceEventKind::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.emit(TraceEventKind::Error, message);
    }

    pub fn critical(&mut self, message: impl Into<String>) {
        self.emit(TraceEventKind::Critical, message);
    }

    /// Push a named operation and emit its Start line at the new depth.
    pub fn start_operation(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.operations.push(name.clone());
        self.emit(TraceEventKind::Start, name);
    }

    /// Emit the Stop line for the innermost operation, then pop it.
    ///
    /// Returns `None` without emitting when no operation is running.
    pub fn stop_operation(&mut self) -> Option<String> {
        let name = self.operations.last()?.clone();
        self.emit(TraceEventKind::Stop, name);
        self.operations.pop()
    }

    /// Flush and detach every sink. The dispatcher stays usable but silent
    /// until new sinks are added.
    pub fn close(&mut self) {
        for mut sink in self.sinks.drain(..) {
            let _ = sink.flush();
        }
        self.operations.clear();
    }
}

impl Drop for TraceDispatcher {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for TraceDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceDispatcher")
            .field("sinks", &self.sinks.len())
            .field("operations", &self.operations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::sink::ConsoleSink;
    use crate::testing::SharedBuffer;

    struct FailingSink;

    impl TraceSink for FailingSink {
        fn write(&mut self, _line: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn operations_frame_nested_output() {
        let buffer = SharedBuffer::default();
        let mut dispatcher =
            TraceDispatcher::new().with_sink(ConsoleSink::with_writer(buffer.clone()));

        dispatcher.start_operation("Updating packages");
        dispatcher.start_operation("Downloading index");
        dispatcher.information("42 packages");
        assert_eq!(dispatcher.stop_operation().as_deref(), Some("Downloading index"));
        dispatcher.warning("one package skipped");
        dispatcher.stop_operation();

        assert_eq!(
            buffer.contents(),
            "-> Updating packages\n\
             --> Downloading index\n\
             42 packages\n\
             --> Finished downloading index\n\
             [Warning] one package skipped\n\
             -> Finished updating packages\n"
        );
        assert_eq!(dispatcher.depth(), 0);
    }

    #[test]
    fn stop_without_operation_is_silent() {
        let buffer = SharedBuffer::default();
        let mut dispatcher =
            TraceDispatcher::new().with_sink(ConsoleSink::with_writer(buffer.clone()));
        assert_eq!(dispatcher.stop_operation(), None);
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn every_sink_receives_events_despite_failures() {
        let first = SharedBuffer::default();
        let second = SharedBuffer::default();
        let mut dispatcher = TraceDispatcher::new()
            .with_sink(ConsoleSink::with_writer(first.clone()))
            .with_sink(FailingSink)
            .with_sink(ConsoleSink::with_writer(second.clone()));

        dispatcher.emit_fmt(TraceEventKind::Error, format_args!("{} failed", "step 3"));
        dispatcher.critical("");

        assert_eq!(first.contents(), "[Error] step 3 failed\n[Critical] \n");
        assert_eq!(second.contents(), first.contents());
    }

    #[test]
    fn close_detaches_sinks() {
        let buffer = SharedBuffer::default();
        let mut dispatcher =
            TraceDispatcher::new().with_sink(ConsoleSink::with_writer(buffer.clone()));
        dispatcher.verbose("before");
        dispatcher.close();
        dispatcher.verbose("after");

        assert_eq!(dispatcher.sink_count(), 0);
        assert_eq!(buffer.contents(), "before\n");
    }
}
