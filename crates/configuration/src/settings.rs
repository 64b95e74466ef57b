use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Whether orders are simulated locally or sent to the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Dryrun,
    Live,
}

impl ExecutionMode {
    pub fn is_live(&self) -> bool {
        matches!(self, ExecutionMode::Live)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Dryrun => "dryrun",
            ExecutionMode::Live => "live",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime settings, sourced from the environment (a `.env` file is loaded
/// by the binary before these are read).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// BINANCE_API_KEY. Only required in live mode.
    #[serde(rename = "binance_api_key")]
    pub api_key: String,
    /// BINANCE_API_SECRET. Only required in live mode.
    #[serde(rename = "binance_api_secret")]
    pub api_secret: String,
    /// MODE: `dryrun` (default) or `live`.
    pub mode: ExecutionMode,
    /// DEFAULT_SYMBOL: used when a command omits the symbol.
    pub default_symbol: String,
    /// JOURNAL_PATH: the JSON-lines audit log file.
    pub journal_path: PathBuf,
    /// MAX_RETRIES: retries after the initial order attempt.
    pub max_retries: u32,
    /// RETRY_BASE_DELAY_MS: first backoff delay; doubles per attempt.
    pub retry_base_delay_ms: u64,
}

impl Settings {
    /// Rejects configurations that cannot work, e.g. live mode without
    /// credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode.is_live() && (self.api_key.is_empty() || self.api_secret.is_empty()) {
            return Err(ConfigError::ValidationError(
                "live mode requires BINANCE_API_KEY and BINANCE_API_SECRET".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dryrun_settings() -> Settings {
        Settings {
            api_key: String::new(),
            api_secret: String::new(),
            mode: ExecutionMode::Dryrun,
            default_symbol: "BTCUSDT".to_string(),
            journal_path: PathBuf::from("azimuth.log"),
            max_retries: 3,
            retry_base_delay_ms: 500,
        }
    }

    #[test]
    fn mode_parses_lowercase_names() {
        assert_eq!(
            serde_json::from_str::<ExecutionMode>("\"dryrun\"").unwrap(),
            ExecutionMode::Dryrun
        );
        assert_eq!(
            serde_json::from_str::<ExecutionMode>("\"live\"").unwrap(),
            ExecutionMode::Live
        );
        assert!(serde_json::from_str::<ExecutionMode>("\"paper\"").is_err());
    }

    #[test]
    fn mode_defaults_to_dryrun() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::Dryrun);
        assert!(!ExecutionMode::default().is_live());
    }

    #[test]
    fn dryrun_needs_no_credentials() {
        assert!(dryrun_settings().validate().is_ok());
    }

    #[test]
    fn live_without_credentials_is_rejected() {
        let mut settings = dryrun_settings();
        settings.mode = ExecutionMode::Live;
        assert!(settings.validate().is_err());

        settings.api_key = "key".to_string();
        settings.api_secret = "secret".to_string();
        assert!(settings.validate().is_ok());
    }
}
