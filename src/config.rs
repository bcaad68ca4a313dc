use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::*;
use crate::error::ConfigError;
use crate::list_view::PagePolicy;
use crate::purchase::PurchaseMode;

/// Console configuration, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub data_path: PathBuf,
    pub purchase_close_delay: Duration,
    pub purchase_mode: PurchaseMode,
    pub page_policy: PagePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            purchase_close_delay: Duration::from_millis(DEFAULT_PURCHASE_CLOSE_DELAY_MS),
            purchase_mode: PurchaseMode::default(),
            page_policy: PagePolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the config from `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url =
            lookup("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        validate_base_url(&api_base_url)?;

        let data_path = lookup("DATA_PATH").unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
        if data_path.trim().is_empty() {
            return Err(ConfigError::Empty("DATA_PATH"));
        }

        let close_delay_ms = match lookup("PURCHASE_CLOSE_DELAY_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid("PURCHASE_CLOSE_DELAY_MS", &raw, e))?,
            None => DEFAULT_PURCHASE_CLOSE_DELAY_MS,
        };

        let purchase_mode = match lookup("PURCHASE_MODE") {
            Some(raw) => raw
                .parse::<PurchaseMode>()
                .map_err(|e| invalid("PURCHASE_MODE", &raw, e))?,
            None => PurchaseMode::default(),
        };

        let page_policy = match lookup("PAGE_POLICY") {
            Some(raw) => raw
                .parse::<PagePolicy>()
                .map_err(|e| invalid("PAGE_POLICY", &raw, e))?,
            None => PagePolicy::default(),
        };

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            data_path: PathBuf::from(data_path),
            purchase_close_delay: Duration::from_millis(close_delay_ms),
            purchase_mode,
            page_policy,
        })
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_path.join(SESSION_FILE_NAME)
    }

    pub fn purchase_ledger_file(&self) -> PathBuf {
        self.data_path.join(PURCHASE_LEDGER_FILE_NAME)
    }
}

fn invalid(var: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| invalid("API_BASE_URL", url, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(
            "API_BASE_URL",
            url,
            format!("unsupported scheme {}", other),
        )),
    }
}
