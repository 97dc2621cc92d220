use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use consolekit::shadow::{self, InventoryHost, RelocationPlan};
use consolekit::telemetry::{ConsoleSink, TraceEvent, TraceEventKind, TraceSink};
use consolekit::Settings;

/// Code unit name of this binary.
const ENTRY_UNIT: &str = "consolekit-cli";

shadow::code_unit!(ENTRY_UNIT, references = [consolekit::units::UNIT_NAME]);

#[derive(Parser, Debug)]
#[command(
    name = "consolekit",
    version,
    about = "Console trace formatting and binary shadow relocation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Move binaries into `_shadow` and leave replaceable copies in place
    Relocate {
        /// Directory to relocate instead of this program's own directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Print the relocation plan as JSON without touching any files
    Plan {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Format a single trace event onto stderr
    Emit {
        #[arg(long, value_enum)]
        kind: Kind,
        /// Logical operation depth for start/stop framing
        #[arg(long, default_value_t = 0)]
        depth: usize,
        message: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
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

impl From<Kind> for TraceEventKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Information => TraceEventKind::Information,
            Kind::Verbose => TraceEventKind::Verbose,
            Kind::Warning => TraceEventKind::Warning,
            Kind::Error => TraceEventKind::Error,
            Kind::Critical => TraceEventKind::Critical,
            Kind::Start => TraceEventKind::Start,
            Kind::Stop => TraceEventKind::Stop,
            Kind::Suspend => TraceEventKind::Suspend,
            Kind::Resume => TraceEventKind::Resume,
            Kind::Transfer => TraceEventKind::Transfer,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load consolekit settings")?;
    consolekit::init_telemetry(&settings).with_context(|| "failed to initialize telemetry")?;

    if settings.shadow.relocate_on_startup {
        consolekit::relocate_current_program(ENTRY_UNIT)
            .with_context(|| "failed to relocate binaries on startup")?;
    }

    match cli.command {
        Command::Relocate { dir } => relocate(dir),
        Command::Plan { dir } => plan(dir),
        Command::Emit {
            kind,
            depth,
            message,
        } => emit(kind.into(), depth, message),
    }
}

fn relocate(dir: Option<PathBuf>) -> anyhow::Result<()> {
    match dir {
        None => consolekit::relocate_current_program(ENTRY_UNIT),
        Some(dir) => {
            let _span = tracing::info_span!("Shadowing binaries").entered();
            shadow::relocate_directory(&mut InventoryHost::new(ENTRY_UNIT), &dir)
        }
    }
}

fn plan(dir: Option<PathBuf>) -> anyhow::Result<()> {
    let plan = match dir {
        Some(dir) => RelocationPlan::for_directory(&dir)?,
        None => RelocationPlan::for_program(&std::env::current_exe()?)?,
    };
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn emit(kind: TraceEventKind, depth: usize, message: Option<String>) -> anyhow::Result<()> {
    let event = TraceEvent::from_optional(kind, message).with_depth(depth);
    ConsoleSink::stderr().handle(&event)?;
    Ok(())
}
