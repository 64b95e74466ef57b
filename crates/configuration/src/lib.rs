use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{ExecutionMode, Settings};

/// Loads the application settings from the environment.
///
/// This function is the primary entry point for this crate. Defaults are
/// layered first, then overridden by environment variables (which the binary
/// has already topped up from a `.env` file if one exists).
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("binance_api_key", "")?
        .set_default("binance_api_secret", "")?
        .set_default("mode", "dryrun")?
        .set_default("default_symbol", "BTCUSDT")?
        .set_default("journal_path", "azimuth.log")?
        .set_default("max_retries", 3)?
        .set_default("retry_base_delay_ms", 500)?
        .add_source(config::Environment::default().try_parsing(true))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
