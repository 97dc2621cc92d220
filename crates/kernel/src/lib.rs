//! Settings shared by consolekit hosts.

pub mod settings;

pub use settings::{Settings, ShadowSettings, TelemetrySettings};
