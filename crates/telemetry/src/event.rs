use std::fmt;

/// Severity or phase tag carried by a [`TraceEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEventKind {
    Information,
    Verbose,
    Warning,
    Error,
    Critical,
    Start,
    Stop,
    Suspend,
    Resume,
    Transfer,
}

impl TraceEventKind {
    pub const ALL: [TraceEventKind; 10] = [
        TraceEventKind::Information,
        TraceEventKind::Verbose,
        TraceEventKind::Warning,
        TraceEventKind::Error,
        TraceEventKind::Critical,
        TraceEventKind::Start,
        TraceEventKind::Stop,
        TraceEventKind::Suspend,
        TraceEventKind::Resume,
        TraceEventKind::Transfer,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            TraceEventKind::Information => "Information",
            TraceEventKind::Verbose => "Verbose",
            TraceEventKind::Warning => "Warning",
            TraceEventKind::Error => "Error",
            TraceEventKind::Critical => "Critical",
            TraceEventKind::Start => "Start",
            TraceEventKind::Stop => "Stop",
            TraceEventKind::Suspend => "Suspend",
            TraceEventKind::Resume => "Resume",
            TraceEventKind::Transfer => "Transfer",
        }
    }

    /// Map a `tracing` level onto the closest event kind.
    pub fn from_level(level: &tracing::Level) -> Self {
        if *level == tracing::Level::ERROR {
            TraceEventKind::Error
        } else if *level == tracing::Level::WARN {
            TraceEventKind::Warning
        } else if *level == tracing::Level::INFO {
            TraceEventKind::Information
        } else {
            TraceEventKind::Verbose
        }
    }
}

impl fmt::Display for TraceEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single diagnostic event as delivered to a [`TraceSink`](crate::TraceSink).
///
/// The message is always present: an absent message is stored as an empty
/// string when the event is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    kind: TraceEventKind,
    message: String,
    depth: usize,
}

impl TraceEvent {
    pub fn new(kind: TraceEventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            depth: 0,
        }
    }

    /// Build an event from a message that may be missing.
    pub fn from_optional(kind: TraceEventKind, message: Option<String>) -> Self {
        Self::new(kind, message.unwrap_or_default())
    }

    /// Set the logical operation nesting depth used by Start/Stop framing.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn kind(&self) -> TraceEventKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
