//! Core types for the betting state layer
//!
//! All types are designed for:
//! - Exact arithmetic (`Decimal` for every monetary value)
//! - Lossless serialization (JSON with string-encoded decimals)
//! - Cheap cloning of identifiers

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create new user ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the id carries no characters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event identifier
///
/// Events are opaque to the system: they exist only as the grouping key of
/// the bets placed against them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    /// Create new event ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the id carries no characters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user and their current balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: UserId,

    /// Current balance
    pub balance: Decimal,
}

impl User {
    /// Create a user with an opening balance
    pub fn new(id: UserId, balance: Decimal) -> Self {
        Self { id, balance }
    }
}

/// Lifecycle of a bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    /// Stake reserved, outcome pending
    Placed,
    /// Settled as a win (terminal)
    Won,
    /// Settled as a loss (terminal)
    Lost,
}

impl BetStatus {
    /// Check if the bet has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, BetStatus::Won | BetStatus::Lost)
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BetStatus::Placed => "placed",
            BetStatus::Won => "won",
            BetStatus::Lost => "lost",
        };
        write!(f, "{}", s)
    }
}

/// A wager against an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    /// Unique bet ID
    pub id: Uuid,

    /// User who placed the bet
    pub user_id: UserId,

    /// Event the bet is against
    pub event_id: EventId,

    /// Odds at placement time (> 0)
    pub odds: Decimal,

    /// Stake reserved from the user's balance (> 0)
    pub amount: Decimal,

    /// Current status
    pub status: BetStatus,

    /// Placement timestamp
    pub placed_at: DateTime<Utc>,
}

impl Bet {
    /// Create a new pending bet with a fresh id
    pub fn new(user_id: UserId, event_id: EventId, odds: Decimal, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            event_id,
            odds,
            amount,
            status: BetStatus::Placed,
            placed_at: Utc::now(),
        }
    }

    /// Payout if the bet wins (stake times odds)
    ///
    /// `None` when the product exceeds the representable range.
    pub fn payout(&self) -> Option<Decimal> {
        self.amount.checked_mul(self.odds).map(|p| p.normalize())
    }
}
