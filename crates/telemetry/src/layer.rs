//! Bridge from `tracing` into a [`TraceSink`].

use std::fmt::{self, Write as _};
use std::sync::{Mutex, PoisonError};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::event::{TraceEvent, TraceEventKind};
use crate::sink::{ConsoleSink, TraceSink};

/// `tracing` layer rendering events through a [`TraceSink`].
///
/// Event levels become Error/Warning/Information/Verbose lines. With span
/// framing enabled, a span's creation and close are rendered as a Start and
/// Stop pair whose depth is the span's position in the span tree.
pub struct ConsoleLayer<K = ConsoleSink> {
    sink: Mutex<K>,
    span_framing: bool,
}

impl ConsoleLayer<ConsoleSink> {
    pub fn stderr() -> Self {
        Self::new(ConsoleSink::stderr())
    }
}

impl<K: TraceSink> ConsoleLayer<K> {
    pub fn new(sink: K) -> Self {
        Self {
            sink: Mutex::new(sink),
            span_framing: true,
        }
    }

    pub fn with_span_framing(mut self, enabled: bool) -> Self {
        self.span_framing = enabled;
        self
    }

    fn deliver(&self, event: &TraceEvent) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = sink.handle(event);
    }
}

/// Label stored on each span so the Stop line repeats the Start text.
struct OperationLabel(String);

impl<S, K> Layer<S> for ConsoleLayer<K>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    K: TraceSink + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if !self.span_framing {
            return;
        }
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut visitor = MessageVisitor::default();
        attrs.record(&mut visitor);
        let label = visitor
            .into_message()
            .unwrap_or_else(|| span.name().to_string());
        let depth = span.scope().count();

        self.deliver(&TraceEvent::new(TraceEventKind::Start, label.clone()).with_depth(depth));
        span.extensions_mut().insert(OperationLabel(label));
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let kind = TraceEventKind::from_level(event.metadata().level());
        let depth = ctx.event_scope(event).map_or(0, |scope| scope.count());
        self.deliver(&TraceEvent::from_optional(kind, visitor.into_message()).with_depth(depth));
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        if !self.span_framing {
            return;
        }
        let Some(span) = ctx.span(&id) else {
            return;
        };

        let depth = span.scope().count();
        let label = span
            .extensions()
            .get::<OperationLabel>()
            .map(|label| label.0.clone())
            .unwrap_or_else(|| span.name().to_string());

        self.deliver(&TraceEvent::new(TraceEventKind::Stop, label).with_depth(depth));
    }
}

/// Collects the `message` field, with any other fields appended as
/// `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: String,
}

impl MessageVisitor {
    fn into_message(self) -> Option<String> {
        match (self.message, self.fields.is_empty()) {
            (message, true) => message,
            (Some(message), false) => Some(message + &self.fields),
            (None, false) => Some(self.fields.trim_start().to_string()),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
