use crate::error::ConfigError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{LoggingSettings, ReportSettings, Settings};

/// Name of the settings file looked up in the working directory, without extension.
pub const DEFAULT_CONFIG_NAME: &str = "journal";

/// Prefix of environment variables, e.g. `JOURNAL__REPORT__TIMEZONE=Europe/London`.
pub const ENV_PREFIX: &str = "JOURNAL";

/// Loads the journal settings from various sources.
///
/// Layering, later sources winning:
/// 1. Built-in defaults.
/// 2. `path` if given (must exist), otherwise an optional `journal.toml`.
/// 3. Environment variables with the `JOURNAL` prefix and `__` separator.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let builder = config::Config::builder().add_source(file).add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    from_builder(builder)
}

/// Deserializes and validates whatever sources the builder holds.
pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    let settings = builder.build()?.try_deserialize::<Settings>()?;
    validate(&settings)?;

    tracing::debug!(
        timezone = %settings.report.timezone,
        ranking_size = settings.report.ranking_size,
        "Configuration loaded."
    );
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.report.ranking_size == 0 {
        return Err(ConfigError::ValidationError(
            "report.ranking_size must be at least 1".to_string(),
        ));
    }
    if settings.report.timezone.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "report.timezone must not be empty".to_string(),
        ));
    }
    if settings.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "logging.level must not be empty".to_string(),
        ));
    }
    Ok(())
}
