//! Service configuration
//!
//! Defaults first, then an optional config file, then environment
//! variables. Bare `REDIS_URL`/`SERVER_HOST`/`SERVER_PORT`/
//! `STARTING_BALANCE` override everything for container deployments.

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;

/// Top-level service configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Redis settings
    pub redis: RedisConfig,
    /// Ledger settings
    pub ledger: LedgerSection,
}

/// HTTP server settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

/// Redis settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RedisConfig {
    /// Connection URL
    pub url: String,
}

/// Ledger settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LedgerSection {
    /// Balance granted to a user created on first reference
    pub starting_balance: String,
}

impl ApiConfig {
    /// Load configuration from defaults, file and environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("ledger.starting_balance", "1000")?;

        if let Ok(config_file) = env::var("CONFIG_FILE") {
            builder = builder.add_source(File::with_name(&config_file).required(false));
        }

        builder = builder.add_source(Environment::with_prefix("BET_API").separator("__"));

        if let Ok(host) = env::var("SERVER_HOST") {
            builder = builder.set_override("server.host", host)?;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(redis_url) = env::var("REDIS_URL") {
            builder = builder.set_override("redis.url", redis_url)?;
        }
        if let Ok(balance) = env::var("STARTING_BALANCE") {
            builder = builder.set_override("ledger.starting_balance", balance)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }
        if self.redis.url.is_empty() {
            return Err("Redis URL is required".to_string());
        }
        if !self.redis.url.starts_with("redis://") && !self.redis.url.starts_with("rediss://") {
            return Err(format!("Unsupported Redis URL: {}", self.redis.url));
        }
        match self.ledger.starting_balance.parse::<Decimal>() {
            Ok(balance) if balance > Decimal::ZERO => Ok(()),
            Ok(balance) => Err(format!(
                "Starting balance must be positive, got {}",
                balance
            )),
            Err(e) => Err(format!("Invalid starting balance: {}", e)),
        }
    }

    /// State-layer configuration derived from this config
    pub fn ledger_config(&self) -> Result<bet_ledger::LedgerConfig, String> {
        let starting_balance = self
            .ledger
            .starting_balance
            .parse()
            .map_err(|e| format!("Invalid starting balance: {}", e))?;
        Ok(bet_ledger::LedgerConfig { starting_balance })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_config() -> ApiConfig {
        ApiConfig {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            redis: RedisConfig {
                url: "redis://127.0.0.1:6379".to_string(),
            },
            ledger: LedgerSection {
                starting_balance: "1000".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_port() {
        let mut config = test_config();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_redis_url() {
        let mut config = test_config();
        config.redis.url = "http://localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_starting_balance() {
        let mut config = test_config();
        config.ledger.starting_balance = "lots".to_string();
        assert!(config.validate().is_err());

        config.ledger.starting_balance = "-5".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ledger_config_parses_balance() {
        let mut config = test_config();
        config.ledger.starting_balance = "2500.50".to_string();
        let ledger = config.ledger_config().unwrap();
        assert_eq!(ledger.starting_balance, dec!(2500.50));
    }
}
