//! Request and response payloads

use bet_ledger::BetStatus;
use bet_settlement::{SettlementOutcome, SettlementResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /v1/bet/place`
#[derive(Debug, Deserialize)]
pub struct PlaceBetRequest {
    /// User placing the bet
    pub user_id: String,
    /// Event the bet is against
    pub event_id: String,
    /// Odds at placement time
    pub odds: Decimal,
    /// Stake to reserve
    pub amount: Decimal,
}

/// Response to a successful placement
#[derive(Debug, Serialize)]
pub struct PlaceBetResponse {
    /// Id of the new bet
    pub bet_id: Uuid,
    /// User placing the bet
    pub user_id: String,
    /// Event the bet is against
    pub event_id: String,
    /// Odds at placement time
    pub odds: Decimal,
    /// Stake reserved
    pub amount: Decimal,
    /// Status of the new bet
    pub status: BetStatus,
}

/// Body of `PUT /v1/bet/settle`
#[derive(Debug, Deserialize)]
pub struct SettleEventRequest {
    /// Event to settle
    pub event_id: String,
    /// Outcome applied to every pending bet of the event
    pub outcome: SettlementOutcome,
}

/// Response to a settlement pass
#[derive(Debug, Serialize)]
pub struct SettleEventResponse {
    /// Event that was settled
    pub event_id: String,
    /// Number of bets settled by this pass
    pub settled: usize,
    /// Number of bets whose settlement failed and which stay pending
    pub failed: u32,
    /// Per-bet entries
    pub results: Vec<SettlementResult>,
}

/// Response to `GET /v1/user/balance/{user_id}`
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// User the balance belongs to
    pub user_id: String,
    /// Current balance
    pub balance: Decimal,
}
