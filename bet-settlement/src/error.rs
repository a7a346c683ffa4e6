//! Error types for the settlement engine

use bet_ledger::EventId;
use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// State-layer error (ledger, journal or store)
    #[error("Ledger error: {0}")]
    Ledger(#[from] bet_ledger::Error),

    /// Malformed placement or settlement input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Nothing eligible to settle for the event
    #[error("No settleable bets for event: {0}")]
    NoSettleableBets(EventId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_settleable_bets_display() {
        let err = Error::NoSettleableBets(EventId::new("e1"));
        assert_eq!(err.to_string(), "No settleable bets for event: e1");
    }

    #[test]
    fn test_ledger_error_wraps() {
        let err: Error = bet_ledger::Error::UserNotFound("u1".to_string()).into();
        assert_eq!(err.to_string(), "Ledger error: User not found: u1");
    }
}
