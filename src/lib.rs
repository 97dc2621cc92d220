//! consolekit
//!
//! Helpers for console programs: trace output formatted for a terminal's
//! error stream, and startup relocation of the program's own binaries so they
//! can be replaced while it runs.

pub mod units;

pub use consolekit_kernel as kernel;
pub use consolekit_shadow as shadow;
pub use consolekit_telemetry as telemetry;

pub use consolekit_kernel::Settings;

/// Install console telemetry using `settings`.
pub fn init_telemetry(settings: &Settings) -> anyhow::Result<()> {
    telemetry::init(&settings.telemetry)
}

/// Relocate the running program's binaries, preloading units reachable from
/// the registered unit named `entry`.
pub fn relocate_current_program(entry: &str) -> anyhow::Result<()> {
    let _span = tracing::info_span!("Shadowing binaries").entered();
    shadow::relocate(&mut shadow::InventoryHost::new(entry))
}
