//! Console trace output for consolekit programs.
//!
//! Events are formatted one line at a time onto the console error stream:
//! informational text as-is, warnings and errors tagged with their kind, and
//! nested operations framed by `-> ` arrows. Output can be driven directly
//! through a [`TraceDispatcher`] or from `tracing` via [`ConsoleLayer`].

pub mod dispatcher;
pub mod event;
pub mod format;
pub mod layer;
pub mod sink;

pub use dispatcher::TraceDispatcher;
pub use event::{TraceEvent, TraceEventKind};
pub use format::format_event;
pub use layer::ConsoleLayer;
pub use sink::{ConsoleSink, TraceSink};

use anyhow::anyhow;
use consolekit_kernel::TelemetrySettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global subscriber that renders through [`ConsoleLayer`] on stderr.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&settings.filter).map_err(|e| anyhow!(e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(ConsoleLayer::stderr().with_span_framing(settings.span_framing))
        .try_init()
        .map_err(|e| anyhow!(e))?;

    tracing::debug!(
        target: "consolekit-telemetry",
        filter = %settings.filter,
        span_framing = settings.span_framing,
        "console telemetry installed"
    );
    Ok(())
}
