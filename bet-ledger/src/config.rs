//! Configuration for the betting state layer

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// State-layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Balance granted to a user created on first reference
    pub starting_balance: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            starting_balance: Decimal::from(1000),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LedgerConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = LedgerConfig::default();

        if let Ok(balance) = std::env::var("STARTING_BALANCE") {
            config.starting_balance = balance
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid STARTING_BALANCE: {}", e)))?;
        }

        Ok(config)
    }
}
