//! Display-line formatting for trace events.

use crate::event::{TraceEvent, TraceEventKind};

const FINISHED: &str = "Finished ";

/// Format `event` as the single line written to the console.
///
/// Information and Verbose messages pass through untouched. Start and Stop
/// are framed by an arrow whose length tracks the operation depth, and Stop
/// messages are rewritten to read "Finished ...". Every other kind is tagged
/// with its name in brackets.
pub fn format_event(event: &TraceEvent) -> String {
    let message = match event.kind() {
        TraceEventKind::Stop => finished(event.message()),
        _ => event.message().to_owned(),
    };

    let prefix = match event.kind() {
        TraceEventKind::Information | TraceEventKind::Verbose => String::new(),
        TraceEventKind::Start | TraceEventKind::Stop => operation_prefix(event.depth()),
        kind => kind_prefix(kind),
    };

    prefix + &message
}

fn kind_prefix(kind: TraceEventKind) -> String {
    format!("[{kind}] ")
}

fn operation_prefix(depth: usize) -> String {
    "-".repeat(depth) + "> "
}

fn finished(message: &str) -> String {
    let mut chars = message.chars();
    let mut rewritten = String::with_capacity(FINISHED.len() + message.len());
    rewritten.push_str(FINISHED);
    if let Some(first) = chars.next() {
        rewritten.extend(first.to_lowercase());
        rewritten.push_str(chars.as_str());
    }
    rewritten
}
