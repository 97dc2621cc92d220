use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_PROFILE: &str = "local";
const PROFILE_VAR_NAME: &str = "CONSOLEKIT_PROFILE";
const CONFIG_DIR_ENV: &str = "CONSOLEKIT_CONFIG_DIR";
const ENV_PREFIX: &str = "CONSOLEKIT";

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub shadow: ShadowSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and profile overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let profile =
            std::env::var(PROFILE_VAR_NAME).unwrap_or_else(|_| DEFAULT_PROFILE.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir, &profile)
    }

    /// Load configuration from an explicit directory and profile name.
    ///
    /// Both `base.toml` and `<profile>.toml` are optional; `CONSOLEKIT_*`
    /// environment variables override file values, using `__` between
    /// nested keys (e.g. `CONSOLEKIT_TELEMETRY__FILTER=debug`).
    pub fn load_from(config_dir: &std::path::Path, profile: &str) -> anyhow::Result<Self> {
        let base_path = config_dir.join("base.toml");
        let profile_path = config_dir.join(format!("{profile}.toml"));

        tracing::debug!(
            base = %base_path.display(),
            profile = %profile_path.display(),
            "loading consolekit settings"
        );

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(profile_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        cfg.try_deserialize()
            .with_context(|| "failed to deserialize configuration")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    /// `EnvFilter` directive string applied to console output.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
    /// Render span open/close as Start/Stop operation lines.
    #[serde(default = "TelemetrySettings::default_span_framing")]
    pub span_framing: bool,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }

    fn default_span_framing() -> bool {
        true
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
            span_framing: Self::default_span_framing(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ShadowSettings {
    /// Relocate the host's own binaries before running a command.
    #[serde(default)]
    pub relocate_on_startup: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_info() {
        let settings = Settings::default();
        assert_eq!(settings.telemetry.filter, "info");
        assert!(settings.telemetry.span_framing);
    }

    #[test]
    fn relocation_is_opt_in() {
        let settings = Settings::default();
        assert!(!settings.shadow.relocate_on_startup);
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path(), "nonexistent").unwrap();
        assert_eq!(settings.telemetry.filter, "info");
    }

    #[test]
    fn profile_overlays_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "[telemetry]\nfilter = \"warn\"\nspan_framing = false\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("ci.toml"),
            "[telemetry]\nfilter = \"debug\"\n\n[shadow]\nrelocate_on_startup = true\n",
        )
        .unwrap();

        let settings = Settings::load_from(dir.path(), "ci").unwrap();
        assert_eq!(settings.telemetry.filter, "debug");
        assert!(!settings.telemetry.span_framing);
        assert!(settings.shadow.relocate_on_startup);
    }
}
