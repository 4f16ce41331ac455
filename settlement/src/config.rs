//! Configuration for the settlement engine and its chat adapter

use serde::{Deserialize, Serialize};

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Currency symbol used in chat summaries
    pub currency_symbol: String,

    /// Keyword that triggers a close from chat
    pub close_keyword: String,

    /// Display name used when partner 1 has no directory entry
    pub fallback_partner_1: String,

    /// Display name used when partner 2 has no directory entry
    pub fallback_partner_2: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
            close_keyword: "close".to_string(),
            fallback_partner_1: "Partner 1".to_string(),
            fallback_partner_2: "Partner 2".to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(symbol) = std::env::var("SETTLEMENT_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Ok(keyword) = std::env::var("SETTLEMENT_CLOSE_KEYWORD") {
            config.close_keyword = keyword;
        }

        Ok(config)
    }
}
