//! Error types for the betting state layer

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger and journal operations
pub type Result<T> = std::result::Result<T, Error>;

/// State-layer errors
#[derive(Error, Debug)]
pub enum Error {
    /// Storage error (Redis or another key-value backend)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Debit rejected because it would drive the balance negative
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Amount the rejected debit asked for
        required: Decimal,

        /// Balance at the time of the check
        available: Decimal,
    },

    /// Monetary arithmetic exceeded the representable range
    #[error("Amount overflow: {0}")]
    Overflow(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_display() {
        let err = Error::InsufficientFunds {
            required: Decimal::from(200),
            available: Decimal::from(150),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: required 200, available 150"
        );
    }

    #[test]
    fn test_user_not_found_display() {
        let err = Error::UserNotFound("u1".to_string());
        assert_eq!(err.to_string(), "User not found: u1");
    }

    #[test]
    fn test_from_string() {
        let err: Error = "boom".into();
        assert!(matches!(err, Error::Other(_)));
    }
}
