//! Settlement vocabulary

use bet_ledger::{BetStatus, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Outcome applied uniformly to every pending bet of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementOutcome {
    /// Pending bets win; payouts are credited
    Won,
    /// Pending bets lose; stakes are kept
    Lost,
}

impl SettlementOutcome {
    /// Terminal bet status this outcome settles to
    pub fn status(&self) -> BetStatus {
        match self {
            SettlementOutcome::Won => BetStatus::Won,
            SettlementOutcome::Lost => BetStatus::Lost,
        }
    }
}

impl fmt::Display for SettlementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SettlementOutcome::Won => "won",
            SettlementOutcome::Lost => "lost",
        };
        write!(f, "{}", s)
    }
}

/// Per-bet settlement entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Settled bet
    pub bet_id: Uuid,

    /// Owner of the bet
    pub user_id: UserId,

    /// Credited payout; zero for a lost bet
    pub amount_won: Decimal,
}

/// Outcome of one settlement pass over an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Entries for the bets this pass settled
    pub results: Vec<SettlementResult>,

    /// Bets whose settlement attempt failed and which stay pending
    pub failed: u32,
}

impl SettlementReport {
    /// Total amount credited by this pass, saturating at the representable
    /// maximum
    pub fn total_won(&self) -> Decimal {
        self.results
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.amount_won))
    }
}
